use serde::{Deserialize, Serialize};
use std::fs;
use anyhow::Result;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub system_config: SystemConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_transcripts_dir")]
    pub transcripts_dir: String,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_transcripts_dir() -> String {
    "transcripts".to_string()
}

fn default_static_dir() -> String {
    "static".to_string()
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;

        // Determine file type by extension
        let path_lower = path.to_lowercase();
        if path_lower.ends_with(".json") {
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            let config: Config = serde_yaml::from_str(&content)?;
            Ok(config)
        }
    }

    /// `PORT` is the one knob deployments set without a config file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(value) = std::env::var("PORT") {
            match value.parse() {
                Ok(port) => self.system_config.port = port,
                Err(_) => tracing::warn!("Ignoring non-numeric PORT value: {}", value),
            }
        }
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            transcripts_dir: default_transcripts_dir(),
            static_dir: default_static_dir(),
        }
    }
}
