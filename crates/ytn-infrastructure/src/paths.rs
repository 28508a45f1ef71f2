//! Path management for ytn configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/ytn/               # Config directory (platform config dir)
//! ├── ytn.toml                 # Notifier settings
//! └── store.toml               # Durable key-value store (token, tracker host)
//! ```

use std::path::{Path, PathBuf};

const APP_DIR: &str = "ytn";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Resolves ytn file locations, optionally under an explicit base directory.
pub struct YtnPaths {
    base: Option<PathBuf>,
}

impl YtnPaths {
    /// `base` overrides the platform config directory (used by tests and `--config-dir`).
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Returns the ytn configuration directory.
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::ConfigDirNotFound),
        }
    }

    pub fn settings_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("ytn.toml"))
    }

    pub fn store_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("store.toml"))
    }
}
