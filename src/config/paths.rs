use crate::config::ConfigError;
use std::path::{Path, PathBuf};

pub const GLOBAL_STATE_DIR: &str = ".scanprep";
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const CONTEXTS_DIR_NAME: &str = "contexts";
pub const LOG_FILE_PATH: &str = "logs/bootstrap.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatePaths {
    root: PathBuf,
}

impl StatePaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `$HOME/.scanprep`.
    pub fn from_home() -> Result<Self, ConfigError> {
        let home = std::env::var_os("HOME").ok_or(ConfigError::HomeDirectoryUnavailable)?;
        Ok(Self::new(PathBuf::from(home).join(GLOBAL_STATE_DIR)))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }

    pub fn contexts_dir(&self) -> PathBuf {
        self.root.join(CONTEXTS_DIR_NAME)
    }

    pub fn log_file(&self) -> PathBuf {
        self.root.join(LOG_FILE_PATH)
    }
}

pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    Ok(StatePaths::from_home()?.config_file())
}
