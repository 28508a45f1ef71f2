//! Loads [`NotifierSettings`] from `ytn.toml`.

use std::path::{Path, PathBuf};

use ytn_core::config::NotifierSettings;
use ytn_core::error::Result;

use crate::paths::YtnPaths;

/// Reads notifier settings, falling back to defaults when the file is absent.
pub struct SettingsService {
    path: PathBuf,
}

impl SettingsService {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Settings file at the standard location.
    pub fn from_paths(paths: &YtnPaths) -> std::result::Result<Self, crate::paths::PathError> {
        Ok(Self::new(paths.settings_file()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<NotifierSettings> {
        if !tokio::fs::try_exists(&self.path).await? {
            tracing::debug!(
                "[SettingsService] {} not found, using defaults",
                self.path.display()
            );
            return Ok(NotifierSettings::default());
        }

        let content = tokio::fs::read_to_string(&self.path).await?;
        let settings: NotifierSettings = toml::from_str(&content)?;
        tracing::debug!("[SettingsService] Loaded settings: {:?}", settings);
        Ok(settings)
    }

    /// Durable store location: `store_file` from settings, else the default.
    pub fn resolve_store_file(settings: &NotifierSettings, paths: &YtnPaths) -> Result<PathBuf> {
        match &settings.store_file {
            Some(file) => Ok(PathBuf::from(file)),
            None => paths
                .store_file()
                .map_err(|e| ytn_core::NotifierError::internal(e.to_string())),
        }
    }
}
