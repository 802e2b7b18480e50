use std::{fs::File, path::PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::services::ocr::{script::ScriptOcr, OcrService};

pub trait Config: Serialize + DeserializeOwned + Default {
    /// Path of the configuration file, relative to the application's
    /// configuration directory.
    fn path() -> &'static str;

    /// Loads a configuration file, or creates a default configuration struct if the file does not exist.
    fn load() -> Result<Self> {
        let mut config_path = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not find suitable config directory"))?;
        config_path.push(env!("CARGO_PKG_NAME"));
        config_path.push(Self::path());

        if !config_path.exists() {
            Ok(Self::default())
        } else {
            let file = File::open(&config_path).with_context(|| {
                format!(
                    "Could not open configuration file: `{}`",
                    config_path.display()
                )
            })?;

            let config = serde_json::from_reader(file).with_context(|| {
                format!(
                    "Could not read configuration file: `{}`",
                    config_path.display(),
                )
            })?;

            Ok(config)
        }
    }

    fn save(&self) -> Result<()> {
        let mut config_path = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not find suitable config directory"))?;
        config_path.push(env!("CARGO_PKG_NAME"));
        config_path.push(Self::path());

        let mut config_dir = config_path.clone();
        config_dir.pop();
        std::fs::create_dir_all(&config_dir).with_context(|| {
            format!(
                "Could not create configuration directory: `{}`",
                config_dir.display()
            )
        })?;

        let file = File::create(&config_path).with_context(|| {
            format!(
                "Could not write to configuration file: `{}`",
                config_path.display()
            )
        })?;

        serde_json::to_writer_pretty(file, self).with_context(|| {
            format!(
                "Could not serialise configuration file: `{}`",
                config_path.display()
            )
        })?;

        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AppConfig {
    pub ocr_service: OcrServiceList,
    /// Legacy export: append each scan as a JSON line to `export_path`.
    pub export_enabled: bool,
    pub export_path: PathBuf,
}

impl Config for AppConfig {
    fn path() -> &'static str {
        "config.json"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ocr_service: OcrServiceList::Script,
            export_enabled: false,
            export_path: PathBuf::from("output/output.csv"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub enum OcrServiceList {
    Script,
}

impl OcrServiceList {
    pub fn create_service(&self) -> Box<dyn OcrService> {
        match self {
            Self::Script => Box::new(ScriptOcr::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_json() {
        let json = serde_json::to_string_pretty(&AppConfig::default()).unwrap();
        let config: AppConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config.ocr_service, OcrServiceList::Script);
        assert!(!config.export_enabled);
        assert_eq!(config.export_path, PathBuf::from("output/output.csv"));
    }

    #[test]
    fn export_can_be_enabled_from_a_config_file() {
        let json = r#"{
            "ocr_service": "Script",
            "export_enabled": true,
            "export_path": "scans/log.jsonl"
        }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();

        assert!(config.export_enabled);
        assert_eq!(config.export_path, PathBuf::from("scans/log.jsonl"));
    }
}
