//! Observer signals.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Control-plane signal fanned out to observer contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    /// New activity exists
    Activity,
    /// Activity has been acknowledged by the user
    Cleared,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Activity => write!(f, "activity"),
            Signal::Cleared => write!(f, "cleared"),
        }
    }
}

/// Why a broadcast reached nobody.
///
/// These are expected conditions, not faults: no observer may have
/// registered since the process started.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BroadcastDeliveryError {
    #[error("no broadcast channel attached")]
    NoChannel,

    #[error("no observers registered")]
    NoRecipients,
}

/// An observer context that reacts to signals.
///
/// Implementations must be idempotent: the same signal may arrive more
/// than once in a row.
#[async_trait]
pub trait SignalRecipient: Send + Sync {
    async fn on_signal(&self, signal: Signal);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_wire_names() {
        assert_eq!(serde_json::to_string(&Signal::Activity).unwrap(), "\"activity\"");
        assert_eq!(serde_json::to_string(&Signal::Cleared).unwrap(), "\"cleared\"");
        assert_eq!(Signal::Cleared.to_string(), "cleared");
    }
}
