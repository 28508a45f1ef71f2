//! Key-value storage port.
//!
//! The host provides two scopes: a durable one that survives restarts
//! (credentials, tracker host) and a session one that is discarded when the
//! host process ends (the dedup record).

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Well-known storage keys.
pub mod keys {
    /// API token (durable scope)
    pub const TOKEN: &str = "token";
    /// Tracker host name, without scheme (durable scope)
    pub const TRACKER_HOST: &str = "youTrackUrl";
    /// Ids of notifications that already produced an alert (session scope)
    pub const DISPLAYED_NOTIFICATIONS: &str = "displayedNotifications";
}

/// Atomic per-key get/set/remove over JSON values.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    async fn set(&self, key: &str, value: Value) -> Result<()>;

    async fn remove(&self, key: &str) -> Result<()>;
}
