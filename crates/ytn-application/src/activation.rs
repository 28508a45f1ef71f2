//! Resolves an activated alert back to its issue page.

use std::sync::Arc;

use ytn_core::alert::AlertHandle;
use ytn_core::config::TrackerCredentials;
use ytn_core::error::Result;
use ytn_core::navigation::Navigator;
use ytn_core::storage::KeyValueStore;

pub struct AlertActivation {
    durable: Arc<dyn KeyValueStore>,
    navigator: Arc<dyn Navigator>,
}

impl AlertActivation {
    pub fn new(durable: Arc<dyn KeyValueStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { durable, navigator }
    }

    /// Opens the issue behind `handle`.
    ///
    /// Returns the opened URL, or `None` when the handle is not ours or the
    /// tracker is not configured.
    pub async fn handle_click(&self, handle: &str) -> Result<Option<String>> {
        let parsed = match handle.parse::<AlertHandle>() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("[AlertActivation] Ignoring alert: {}", e);
                return Ok(None);
            }
        };

        let Some(credentials) = TrackerCredentials::load(self.durable.as_ref()).await? else {
            tracing::debug!("[AlertActivation] Tracker not configured");
            return Ok(None);
        };

        let url = credentials.issue_url(parsed.issue_id());
        self.navigator.open(&url).await?;

        tracing::info!(issue_id = %parsed.issue_id(), "[AlertActivation] Opened {}", url);
        Ok(Some(url))
    }
}
