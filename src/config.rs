// User configuration
//
// Lives at ~/.errand/config.json. Every field has a default, so a missing
// file (or a file with only some keys) is fine.

use crate::error::{ErrandError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR: &str = ".errand";
const CONFIG_FILE: &str = "config.json";
const DATABASE_FILE: &str = "errand.db";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub database_path: PathBuf,
    /// How many past utterances the conversation context keeps
    pub history_capacity: usize,
    pub suggestion_limit: usize,
    /// tracing filter directive, e.g. "info" or "errand_lib=debug"
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: app_dir().join(DATABASE_FILE),
            history_capacity: 10,
            suggestion_limit: 5,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load from the default location, falling back to defaults when absent
    pub fn load() -> Result<Self> {
        Self::load_from(app_dir().join(CONFIG_FILE))
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&raw)
            .map_err(|e| ErrandError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.history_capacity == 0 {
            return Err(ErrandError::Config(
                "history_capacity must be at least 1".to_string(),
            ));
        }
        if self.suggestion_limit == 0 {
            return Err(ErrandError::Config(
                "suggestion_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

// Falls back to the working directory when there's no home (containers, CI)
fn app_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}
