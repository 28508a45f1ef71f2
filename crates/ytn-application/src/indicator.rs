use async_trait::async_trait;
use tokio::sync::watch;
use ytn_core::broadcast::{Signal, SignalRecipient};

/// What an activity indicator currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndicatorState {
    #[default]
    Idle,
    Active,
}

/// Reference observer: tracks whether unacknowledged activity exists.
///
/// Renderers follow changes through [`subscribe`](Self::subscribe); repeated
/// signals do not wake them.
pub struct ActivityIndicator {
    tx: watch::Sender<IndicatorState>,
}

impl ActivityIndicator {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(IndicatorState::Idle);
        Self { tx }
    }

    pub fn state(&self) -> IndicatorState {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<IndicatorState> {
        self.tx.subscribe()
    }
}

impl Default for ActivityIndicator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SignalRecipient for ActivityIndicator {
    async fn on_signal(&self, signal: Signal) {
        let next = match signal {
            Signal::Activity => IndicatorState::Active,
            Signal::Cleared => IndicatorState::Idle,
        };

        let changed = self.tx.send_if_modified(|state| {
            if *state == next {
                return false;
            }
            *state = next;
            true
        });

        if changed {
            tracing::debug!("[ActivityIndicator] {:?}", next);
        }
    }
}
