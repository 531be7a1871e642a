use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;

use crate::model::lot::DEFAULT_CAPACITY;

const CONFIG_DIR_NAME: &str = "parkstat";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding the report workbooks and the log file.
    pub reports_dir: PathBuf,
    /// Spaces in the simulated lot.
    pub capacity: u32,
    pub tick_millis: u64,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reports_dir: PathBuf::from("."),
            capacity: DEFAULT_CAPACITY,
            tick_millis: 1000,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Loads `explicit` if given, otherwise the per-user config file when it
    /// exists, otherwise the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match default_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            bail!("capacity must be at least 1");
        }
        if self.tick_millis == 0 {
            bail!("tick_millis must be at least 1");
        }
        if self.log_level.trim().is_empty() {
            return Err(anyhow!("log_level must not be empty"));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }
}

pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.capacity, 50);
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_partial_override() {
        let config =
            Config::from_json(r#"{ "reports_dir": "/tmp/reports", "tick_millis": 250 }"#).unwrap();
        assert_eq!(config.reports_dir, PathBuf::from("/tmp/reports"));
        assert_eq!(config.tick_interval(), Duration::from_millis(250));
        assert_eq!(config.capacity, 50);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(Config::from_json(r#"{ "capacity": 0 }"#).is_err());
        assert!(Config::from_json(r#"{ "tick_millis": 0 }"#).is_err());
        assert!(Config::from_json(r#"{ "log_level": " " }"#).is_err());
        assert!(Config::from_json(r#"{ "capacty": 10 }"#).is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "capacity": 80 }"#).unwrap();

        assert_eq!(Config::load(Some(path.as_path())).unwrap().capacity, 80);
        assert!(Config::load(Some(dir.path().join("missing.json").as_path())).is_err());
    }
}
