use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{NotifierError, Result};
use crate::storage::{KeyValueStore, keys};

/// Credentials needed to reach the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerCredentials {
    pub api_token: String,
    /// Host name such as `acme.youtrack.cloud`, without scheme
    pub tracker_host: String,
}

impl TrackerCredentials {
    pub fn new(api_token: impl Into<String>, tracker_host: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            tracker_host: normalize_host(&tracker_host.into()),
        }
    }

    /// Reads credentials from the durable store.
    ///
    /// Fails with [`NotifierError::ConfigMissing`] naming the first key that is
    /// absent or blank.
    pub async fn require(store: &dyn KeyValueStore) -> Result<Self> {
        let api_token = non_empty_string(store.get(keys::TOKEN).await?)
            .ok_or_else(|| NotifierError::config_missing(keys::TOKEN))?;
        let tracker_host = non_empty_string(store.get(keys::TRACKER_HOST).await?)
            .ok_or_else(|| NotifierError::config_missing(keys::TRACKER_HOST))?;

        Ok(Self::new(api_token, tracker_host))
    }

    /// Like [`require`](Self::require), but "not configured yet" is `Ok(None)`.
    pub async fn load(store: &dyn KeyValueStore) -> Result<Option<Self>> {
        match Self::require(store).await {
            Ok(credentials) => Ok(Some(credentials)),
            Err(e) if e.is_config_missing() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Writes credentials to the durable store.
    pub async fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        store
            .set(keys::TOKEN, Value::String(self.api_token.clone()))
            .await?;
        store
            .set(keys::TRACKER_HOST, Value::String(self.tracker_host.clone()))
            .await
    }

    /// Browser URL of an issue on this tracker.
    pub fn issue_url(&self, issue_id: &str) -> String {
        format!("https://{}/issue/{}", self.tracker_host, issue_id)
    }
}

fn normalize_host(host: &str) -> String {
    host.trim().trim_end_matches('/').to_string()
}

fn non_empty_string(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        _ => None,
    }
}

/// Host-level settings for the notifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifierSettings {
    /// Seconds between scheduled poll cycles
    pub poll_interval_secs: u64,
    /// Per-request timeout for the tracker API
    pub request_timeout_secs: u64,
    /// Icon shown with every alert
    pub icon_ref: String,
    /// Durable store file; defaults to the config directory when unset
    pub store_file: Option<String>,
}

impl Default for NotifierSettings {
    fn default() -> Self {
        Self {
            poll_interval_secs: 60,
            request_timeout_secs: 30,
            icon_ref: "icons/favicon-128x128.png".to_string(),
            store_file: None,
        }
    }
}

impl NotifierSettings {
    pub fn poll_interval(&self) -> Duration {
        // A zero period would make tokio's interval panic
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}
