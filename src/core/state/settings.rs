use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::core::error::{PackError, PackResult};
use crate::core::meta::MULTIMC_META;

const APP_DIR_NAME: &str = "packdev";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub meta_endpoint: String,
    /// Concurrent fetches within one resolution round.
    pub fetch_concurrency: usize,
    pub user_agent: String,
    pub request_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            meta_endpoint: MULTIMC_META.to_string(),
            fetch_concurrency: 8,
            user_agent: concat!("packdev/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout_secs: None,
        }
    }
}

impl Settings {
    /// Load settings from `path`, or from the default location when no
    /// path is given. A missing default file yields the defaults; a missing
    /// explicit file is an error.
    pub fn load(path: Option<&Path>) -> PackResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let path = default_settings_path();
                if path.exists() {
                    Self::from_file(&path)
                } else {
                    debug!("No settings at {:?}, using defaults", path);
                    Ok(Self::default())
                }
            }
        }
    }

    fn from_file(path: &Path) -> PackResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| PackError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings = serde_json::from_str(&raw)
            .map_err(|e| PackError::Config(format!("{}: {}", path.display(), e)))?;
        settings.validate()?;
        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    pub fn validate(&self) -> PackResult<()> {
        if self.meta_endpoint.trim().is_empty() {
            return Err(PackError::Config("meta_endpoint must not be empty".into()));
        }
        if self.fetch_concurrency == 0 {
            return Err(PackError::Config("fetch_concurrency must be at least 1".into()));
        }
        Ok(())
    }
}

pub fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join(SETTINGS_FILE)
}
