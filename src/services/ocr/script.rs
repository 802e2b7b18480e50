use std::{
    io::{BufRead, BufReader, Read},
    path::Path,
    process::{Command, Stdio},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{config::Config, services::ServiceJob};

use super::{OcrOutcome, OcrService, ScanText};

/// Runs the external OCR program on a file and interprets the single JSON
/// document it writes to stdout.
#[derive(Default)]
pub struct ScriptOcr {
    config: ScriptOcrConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScriptOcrConfig {
    pub program: String,
    /// Arguments placed before the scanned file's path; the path itself is
    /// always appended last.
    pub args: Vec<String>,
}

impl Default for ScriptOcrConfig {
    fn default() -> Self {
        Self {
            program: "python".to_owned(),
            args: vec!["extract_rx.py".to_owned()],
        }
    }
}

impl Config for ScriptOcrConfig {
    fn path() -> &'static str {
        "ocr_services/script.json"
    }
}

impl OcrService for ScriptOcr {
    fn init(&mut self) -> Result<()> {
        self.config =
            ScriptOcrConfig::load().context("Script: Failed to load configuration file")?;
        Ok(())
    }

    fn terminate(&mut self) -> Result<()> {
        self.config
            .save()
            .context("Script: Failed to save configuration file")?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "Script"
    }

    fn scan(&mut self, path: &Path) -> ServiceJob<Result<OcrOutcome>> {
        let program = self.config.program.clone();
        let args = self.config.args.clone();
        let path = path.to_owned();

        ServiceJob::new(move || run_scan(&program, &args, &path))
    }
}

/// Blocks until the OCR program closes its stdout. No timeout is imposed: a
/// collaborator that never closes its output stream stalls this job until the
/// application exits.
fn run_scan(program: &str, args: &[String], path: &Path) -> Result<OcrOutcome> {
    log::info!("Script: running `{program}` on `{}`", path.display());

    let mut child = Command::new(program)
        .args(args)
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("Script: Failed to launch OCR program `{program}`"))?;

    let stdout = child
        .stdout
        .take()
        .context("Script: Child process has no stdout handle")?;
    let stderr = child
        .stderr
        .take()
        .context("Script: Child process has no stderr handle")?;

    // stderr has to be drained while stdout is still being read, or the child
    // can stall on a full pipe. Diagnostics only; never affects the outcome.
    let stderr_drain = std::thread::spawn(move || {
        for line in BufReader::new(stderr).lines() {
            match line {
                Ok(line) => log::debug!("Script: stderr: {line}"),
                Err(_) => break,
            }
        }
    });

    let mut output = Vec::new();
    BufReader::new(stdout)
        .read_to_end(&mut output)
        .context("Script: Failed to read OCR program output")?;

    let status = child.wait().context("Script: Failed to wait on OCR program")?;
    log::debug!("Script: OCR program exited with {status}");
    let _ = stderr_drain.join();

    Ok(parse_output(&output))
}

/// Interprets the complete stdout of one invocation as a single JSON document.
fn parse_output(output: &[u8]) -> OcrOutcome {
    let document: serde_json::Value = match serde_json::from_slice(output) {
        Ok(document) => document,
        Err(e) => {
            log::warn!("Script: OCR program output was not a single JSON document: {e}");
            return OcrOutcome::Unparsable;
        }
    };

    if let Some(error) = document.get("error") {
        let message = error
            .as_str()
            .map(str::to_owned)
            .unwrap_or_else(|| error.to_string());
        if let Some(trace) = document.get("trace").and_then(serde_json::Value::as_str) {
            log::error!("Script: OCR failure trace:\n{trace}");
        }
        return OcrOutcome::Failure { message };
    }

    match serde_json::from_value::<ScanText>(document) {
        Ok(scan) => OcrOutcome::Text(scan),
        Err(e) => {
            log::warn!("Script: OCR program output had no usable text field: {e}");
            OcrOutcome::Unparsable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_document_passes_text_through_unmodified() {
        let outcome = parse_output(br#"{"text":"Amoxicillin 500mg"}"#);
        match outcome {
            OcrOutcome::Text(scan) => assert_eq!(scan.text, "Amoxicillin 500mg"),
            other => panic!("expected text outcome, got {other:?}"),
        }
    }

    #[test]
    fn error_document_reports_failure_with_or_without_trace() {
        let with_trace = parse_output(br#"{"error":"no text found","trace":"stack..."}"#);
        match with_trace {
            OcrOutcome::Failure { message } => assert_eq!(message, "no text found"),
            other => panic!("expected failure outcome, got {other:?}"),
        }

        let without_trace = parse_output(br#"{"error":"no text found"}"#);
        match without_trace {
            OcrOutcome::Failure { message } => assert_eq!(message, "no text found"),
            other => panic!("expected failure outcome, got {other:?}"),
        }
    }

    #[test]
    fn error_document_takes_precedence_over_a_text_field() {
        let outcome = parse_output(br#"{"text":"partial","error":"scan was blurry"}"#);
        match outcome {
            OcrOutcome::Failure { message } => assert_eq!(message, "scan was blurry"),
            other => panic!("expected failure outcome, got {other:?}"),
        }
    }

    #[test]
    fn empty_or_malformed_output_is_unparsable() {
        assert!(matches!(parse_output(b""), OcrOutcome::Unparsable));
        assert!(matches!(
            parse_output(br#"{"text":"trunc"#),
            OcrOutcome::Unparsable
        ));
        assert!(matches!(
            parse_output(b"Traceback (most recent call last):"),
            OcrOutcome::Unparsable
        ));
    }

    #[test]
    fn valid_json_without_a_usable_text_field_is_unparsable() {
        assert!(matches!(parse_output(b"[1, 2, 3]"), OcrOutcome::Unparsable));
        assert!(matches!(
            parse_output(br#"{"text": 42}"#),
            OcrOutcome::Unparsable
        ));
    }

    #[cfg(unix)]
    mod collaborator {
        use super::*;

        /// A `ScriptOcr` whose collaborator is a shell one-liner; the scanned
        /// file's path arrives as `$1`.
        fn script_service(script: &str) -> ScriptOcr {
            ScriptOcr {
                config: ScriptOcrConfig {
                    program: "sh".to_owned(),
                    args: vec!["-c".to_owned(), script.to_owned(), "collaborator".to_owned()],
                },
            }
        }

        fn scan(service: &mut ScriptOcr, path: &Path) -> Result<OcrOutcome> {
            service.scan(path).wait().unwrap()
        }

        #[test]
        fn chunked_stdout_is_buffered_until_eof() {
            let mut service = script_service(r#"printf '{"te'; sleep 0.2; printf 'xt":"abc"}'"#);
            let outcome = scan(&mut service, Path::new("/dev/null")).unwrap();
            assert_eq!(outcome.text(), Some("abc"));
        }

        #[test]
        fn the_file_path_is_passed_as_the_final_argument() {
            let mut service = script_service(r#"printf '{"text":"%s"}' "$1""#);
            let outcome = scan(&mut service, Path::new("/tmp/scan1.pdf")).unwrap();
            assert_eq!(outcome.text(), Some("/tmp/scan1.pdf"));
        }

        #[test]
        fn stderr_never_affects_the_outcome() {
            let mut service =
                script_service(r#"echo 'loading model...' >&2; printf '{"text":"ok"}'"#);
            let outcome = scan(&mut service, Path::new("/dev/null")).unwrap();
            assert_eq!(outcome.text(), Some("ok"));
        }

        #[test]
        fn a_collaborator_that_dies_without_output_is_unparsable() {
            let mut service = script_service("exit 3");
            let outcome = scan(&mut service, Path::new("/dev/null")).unwrap();
            assert!(matches!(outcome, OcrOutcome::Unparsable));
        }

        #[test]
        fn a_missing_program_resolves_the_job_to_an_error() {
            let mut service = ScriptOcr {
                config: ScriptOcrConfig {
                    program: "rxscan-no-such-program".to_owned(),
                    args: Vec::new(),
                },
            };
            let result = service.scan(Path::new("/dev/null")).wait().unwrap();
            assert!(result.is_err());
        }
    }
}
