//! Alert model and the alert delivery port.
//!
//! An alert carries an opaque handle string. The delivery collaborator hands
//! the same string back when the user acts on the alert; [`AlertHandle`] is
//! the only place that knows how that string is laid out.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;

use crate::error::Result;

/// Discriminator used for issue alerts inside the handle string.
const ISSUE_KIND: &str = "issue";

/// What an alert points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertTarget {
    /// A tracker issue, e.g. `ABC-123`
    Issue { issue_id: String },
}

/// Identifies a displayed alert and the target it resolves to.
///
/// Serialized as `{created_at_ms}:issue:{issue_id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertHandle {
    /// Creation time in milliseconds since the Unix epoch
    pub created_at_ms: i64,
    pub target: AlertTarget,
}

impl AlertHandle {
    /// Creates a handle for an issue alert stamped with the current time.
    pub fn for_issue(issue_id: impl Into<String>) -> Self {
        Self {
            created_at_ms: Utc::now().timestamp_millis(),
            target: AlertTarget::Issue {
                issue_id: issue_id.into(),
            },
        }
    }

    /// Returns the issue id this handle resolves to.
    pub fn issue_id(&self) -> &str {
        match &self.target {
            AlertTarget::Issue { issue_id } => issue_id,
        }
    }
}

impl fmt::Display for AlertHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            AlertTarget::Issue { issue_id } => {
                write!(f, "{}:{}:{}", self.created_at_ms, ISSUE_KIND, issue_id)
            }
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlertHandleError {
    #[error("malformed alert handle: {0:?}")]
    Malformed(String),

    #[error("unknown alert kind {kind:?}")]
    UnknownKind { kind: String },
}

impl FromStr for AlertHandle {
    type Err = AlertHandleError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let malformed = || AlertHandleError::Malformed(s.to_string());

        let mut parts = s.splitn(3, ':');
        let created_at_ms = parts
            .next()
            .and_then(|ts| ts.parse::<i64>().ok())
            .ok_or_else(malformed)?;
        let kind = parts.next().ok_or_else(malformed)?;
        let payload = parts.next().ok_or_else(malformed)?;

        match kind {
            ISSUE_KIND if !payload.is_empty() => Ok(Self {
                created_at_ms,
                target: AlertTarget::Issue {
                    issue_id: payload.to_string(),
                },
            }),
            ISSUE_KIND => Err(malformed()),
            other => Err(AlertHandleError::UnknownKind {
                kind: other.to_string(),
            }),
        }
    }
}

/// Content of a user-visible alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertContent {
    pub title: String,
    pub message: String,
    /// Icon reference understood by the delivery collaborator
    pub icon_ref: String,
    /// Whether activating the alert should hand the handle back
    pub clickable: bool,
}

/// Alert delivery collaborator (OS notification center, tray, etc.).
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Displays an alert identified by `handle`.
    async fn create(&self, handle: &str, alert: &AlertContent) -> Result<()>;
}
