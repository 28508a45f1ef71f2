//! Tracker notification source port.

use async_trait::async_trait;

use crate::config::TrackerCredentials;
use crate::error::Result;
use crate::notification::Notification;

/// Fetches the current user's notifications from the tracker.
#[async_trait]
pub trait NotificationSource: Send + Sync {
    /// Returns the notification list, or a `Network`/`Http` error.
    async fn fetch_notifications(
        &self,
        credentials: &TrackerCredentials,
    ) -> Result<Vec<Notification>>;
}
