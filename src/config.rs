use anyhow::Result;
use config::{Config, Environment};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl RemoteSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub remote: RemoteSettings,
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,
}

impl Settings {
    /// Layer `COLLOQUY_`-prefixed environment variables over the defaults,
    /// e.g. `COLLOQUY_REMOTE__HOST` or `COLLOQUY_STORAGE_DIR`.
    pub fn new() -> Result<Self> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("COLLOQUY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            remote: RemoteSettings::default(),
            storage_dir: default_storage_dir(),
        }
    }
}

fn default_host() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_storage_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("colloquy")
        .join("conversations")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.remote.host, "http://localhost:3000");
        assert_eq!(settings.remote.timeout(), Duration::from_secs(30));
        assert!(settings.storage_dir.ends_with("colloquy/conversations"));
    }

    #[test]
    fn test_new_without_env_uses_defaults() {
        let settings = Settings::new().unwrap();
        assert_eq!(settings.remote.host, default_host());
    }
}
