use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::Path,
};

use anyhow::{Context, Result};

use crate::services::ocr::ScanText;

/// Appends the scan payload as one JSON line to the export file, creating
/// parent directories as needed.
pub fn append_scan(path: &Path, scan: &ScanText) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Could not create export directory: `{}`", parent.display())
            })?;
        }
    }

    let line = serde_json::to_string(scan).context("Could not serialise scan for export")?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Could not open export file: `{}`", path.display()))?;

    writeln!(file, "{line}")
        .with_context(|| format!("Could not write to export file: `{}`", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_one_json_line_per_scan() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output/output.csv");

        append_scan(
            &path,
            &ScanText {
                text: "Amoxicillin 500mg".to_owned(),
            },
        )
        .unwrap();
        append_scan(
            &path,
            &ScanText {
                text: "Ibuprofen 200mg".to_owned(),
            },
        )
        .unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: ScanText = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.text, "Amoxicillin 500mg");
        let second: ScanText = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second.text, "Ibuprofen 200mg");
    }
}
