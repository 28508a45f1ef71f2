//! Error types for YTN.

use thiserror::Error;

use crate::parser::ParseError;
use crate::payload::DecodeError;

/// A shared error type for the notifier.
///
/// Every variant is scoped to the smallest unit that failed: a poll cycle
/// (`ConfigMissing`, `Network`, `Http`, `DataAccess`) or a single
/// notification (`Decode`, `Parse`, `AlertDelivery`).
#[derive(Error, Debug, Clone)]
pub enum NotifierError {
    /// Required configuration value is absent
    #[error("Configuration missing: {key}")]
    ConfigMissing { key: &'static str },

    /// Request could not be sent or the response body could not be read
    #[error("Network error: {0}")]
    Network(String),

    /// Tracker answered with a non-success status
    #[error("HTTP error: status {status} - {message}")]
    Http { status: u16, message: String },

    /// Notification payload could not be decoded
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Decoded payload did not match the expected text format
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Alert delivery collaborator refused the alert
    #[error("Alert delivery error: {0}")]
    AlertDelivery(String),

    /// Data access error (storage layer)
    #[error("Data access error: {0}")]
    DataAccess(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl NotifierError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a ConfigMissing error
    pub fn config_missing(key: &'static str) -> Self {
        Self::ConfigMissing { key }
    }

    /// Creates a Network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates an Http error
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a DataAccess error
    pub fn data_access(message: impl Into<String>) -> Self {
        Self::DataAccess(message.into())
    }

    /// Creates an AlertDelivery error
    pub fn alert_delivery(message: impl Into<String>) -> Self {
        Self::AlertDelivery(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a ConfigMissing error
    pub fn is_config_missing(&self) -> bool {
        matches!(self, Self::ConfigMissing { .. })
    }

    /// Check if the failure came from talking to the tracker.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Http { .. })
    }

    /// Check if the failure is scoped to a single notification.
    ///
    /// Item failures are logged and skipped; the rest of the batch continues.
    pub fn is_item_failure(&self) -> bool {
        matches!(
            self,
            Self::Decode(_) | Self::Parse(_) | Self::AlertDelivery(_)
        )
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for NotifierError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for NotifierError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for NotifierError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for NotifierError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, NotifierError>`.
pub type Result<T> = std::result::Result<T, NotifierError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_failures_are_classified() {
        let decode: NotifierError = DecodeError::MissingContent.into();
        let parse: NotifierError = ParseError::MissingSeparator.into();

        assert!(decode.is_item_failure());
        assert!(parse.is_item_failure());
        assert!(!NotifierError::network("refused").is_item_failure());
    }

    #[test]
    fn test_network_classification() {
        assert!(NotifierError::http(401, "unauthorized").is_network());
        assert!(NotifierError::network("timeout").is_network());
        assert!(!NotifierError::config_missing("token").is_network());
    }

    #[test]
    fn test_config_missing_names_key() {
        let err = NotifierError::config_missing("youTrackUrl");
        assert!(err.is_config_missing());
        assert_eq!(err.to_string(), "Configuration missing: youTrackUrl");
    }

    #[test]
    fn test_io_conversion_keeps_kind() {
        let err: NotifierError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(err.to_string().contains("NotFound"));
    }
}
