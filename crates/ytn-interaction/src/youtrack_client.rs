//! YouTrackClient - REST client for the YouTrack notifications endpoint.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use ytn_core::NotifierError;
use ytn_core::config::TrackerCredentials;
use ytn_core::error::Result;
use ytn_core::notification::Notification;
use ytn_core::tracker::NotificationSource;

const NOTIFICATIONS_PATH: &str = "/api/users/notifications";
const NOTIFICATION_FIELDS: &str = "id,content,metadata";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Notification source that talks to the YouTrack REST API.
#[derive(Clone)]
pub struct YouTrackClient {
    client: Client,
    scheme: String,
    timeout: Duration,
}

impl YouTrackClient {
    /// Creates a client that reaches the tracker over HTTPS.
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            scheme: "https".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the URL scheme (plain `http` for local trackers and tests).
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Full URL of the notifications endpoint for `host`.
    pub fn notifications_url(&self, host: &str) -> String {
        format!(
            "{}://{}{}?fields={}",
            self.scheme, host, NOTIFICATIONS_PATH, NOTIFICATION_FIELDS
        )
    }

    /// Makes an authenticated request to the tracker.
    fn auth_request(
        &self,
        request: reqwest::RequestBuilder,
        credentials: &TrackerCredentials,
    ) -> reqwest::RequestBuilder {
        request.header(
            reqwest::header::AUTHORIZATION,
            format!("Bearer {}", credentials.api_token),
        )
    }
}

impl Default for YouTrackClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationSource for YouTrackClient {
    async fn fetch_notifications(
        &self,
        credentials: &TrackerCredentials,
    ) -> Result<Vec<Notification>> {
        let url = self.notifications_url(&credentials.tracker_host);
        tracing::debug!("[YouTrackClient] GET {}", url);

        let request = self.auth_request(
            self.client
                .get(&url)
                .header(reqwest::header::ACCEPT, "application/json")
                .timeout(self.timeout),
            credentials,
        );

        let response = request
            .send()
            .await
            .map_err(|e| NotifierError::network(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(NotifierError::http(status.as_u16(), error_text));
        }

        let body = response
            .text()
            .await
            .map_err(|e| NotifierError::network(format!("Failed to read response: {}", e)))?;
        let notifications: Vec<Notification> = serde_json::from_str(&body)?;

        tracing::debug!(
            "[YouTrackClient] Received {} notification(s)",
            notifications.len()
        );

        Ok(notifications)
    }
}
