//! Notification models.

use serde::{Deserialize, Serialize};

/// A notification as returned by the tracker's notification endpoint.
///
/// Identity is `id`; the record is never modified after it is received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Tracker-assigned notification id
    pub id: String,
    /// Base64 + gzip encoded message body
    #[serde(default)]
    pub content: Option<String>,
    /// Encoded metadata blob (not interpreted)
    #[serde(default)]
    pub metadata: Option<String>,
}

impl Notification {
    /// Creates a notification with the given encoded content.
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: Some(content.into()),
            metadata: None,
        }
    }
}

/// The structured result of parsing a decoded notification body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedNotification {
    /// Issue identifier taken from the issue URL line (e.g. `ABC-123`)
    pub issue_id: String,
    /// Message text shown to the user, URL line and footer removed
    pub formatted_message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_api_response() {
        let body = r#"[
            {"id": "1-2", "content": "H4sI", "metadata": "H4sIAA", "$type": "Notification"},
            {"id": "1-3", "content": null, "metadata": null}
        ]"#;

        let notifications: Vec<Notification> = serde_json::from_str(body).unwrap();

        assert_eq!(notifications.len(), 2);
        assert_eq!(notifications[0].id, "1-2");
        assert_eq!(notifications[0].content.as_deref(), Some("H4sI"));
        assert!(notifications[1].content.is_none());
    }

    #[test]
    fn test_missing_optional_fields() {
        let notification: Notification = serde_json::from_str(r#"{"id": "7"}"#).unwrap();
        assert_eq!(notification.id, "7");
        assert!(notification.content.is_none());
        assert!(notification.metadata.is_none());
    }
}
