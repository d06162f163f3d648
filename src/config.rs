use crate::models::{FileExtension, NamePolicy};
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    #[serde(default)]
    pub export: ExportConfig,
}

/// Site-level export defaults, overridable per run from the CLI.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ExportConfig {
    pub settings_path: String,
    pub output_dir: String,
    #[serde(default)]
    pub file_extension: FileExtension,
    #[serde(default)]
    pub name_policy: NamePolicy,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            settings_path: "config/organization.yaml".to_string(),
            output_dir: "./output".to_string(),
            file_extension: FileExtension::Txt,
            name_policy: NamePolicy::Truncate,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: "./logs".to_string(),
            log_file: "masav_engine.log".to_string(),
            use_json: false,
            rotation: "daily".to_string(),
            export: ExportConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load `config/{env}.yaml`, falling back to defaults when the file
    /// does not exist (the CLI can run on flags alone).
    pub fn load(env: &str) -> anyhow::Result<Self> {
        let config_path = format!("config/{}.yaml", env);
        match fs::read_to_string(&config_path) {
            Ok(content) => serde_yaml::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", config_path, e)),
            Err(_) => Ok(Self::default()),
        }
    }
}
