//! Fan-out of [`Signal`]s to observer contexts.

use std::sync::{Arc, OnceLock};

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use ytn_core::broadcast::{BroadcastDeliveryError, Signal, SignalRecipient};

const DEFAULT_CAPACITY: usize = 16;

/// Best-effort broadcast of signals to every registered observer.
#[derive(Clone)]
pub struct BroadcastChannel {
    tx: broadcast::Sender<Signal>,
}

impl BroadcastChannel {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// `capacity` bounds how far a slow observer may fall behind before it
    /// starts skipping signals. Zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Sends `signal` to every observer registered right now.
    ///
    /// Returns the number of observers reached.
    pub fn broadcast(&self, signal: Signal) -> Result<usize, BroadcastDeliveryError> {
        self.tx
            .send(signal)
            .map_err(|_| BroadcastDeliveryError::NoRecipients)
    }

    /// Reports that the user paid attention; fans `cleared` out to all observers.
    pub fn acknowledge(&self) -> Result<usize, BroadcastDeliveryError> {
        self.broadcast(Signal::Cleared)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Signal> {
        self.tx.subscribe()
    }

    pub fn observer_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Registers `recipient` with its own receive loop.
    ///
    /// The receiver is created before this returns, so signals sent after
    /// the call are never missed (unless the observer lags).
    pub fn spawn_observer(&self, recipient: Arc<dyn SignalRecipient>) -> ObserverHandle {
        let mut rx = self.tx.subscribe();
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    received = rx.recv() => match received {
                        Ok(signal) => recipient.on_signal(signal).await,
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!("[BroadcastChannel] Observer lagged, skipped {} signal(s)", skipped);
                        }
                        Err(RecvError::Closed) => break,
                    },
                }
            }
            tracing::debug!("[BroadcastChannel] Observer loop ended");
        });

        ObserverHandle { cancel, task }
    }
}

impl Default for BroadcastChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Running observer registration.
pub struct ObserverHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl ObserverHandle {
    /// Unregisters the observer. Signals already queued may still be skipped.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub async fn join(self) {
        if let Err(e) = self.task.await {
            tracing::error!("[BroadcastChannel] Observer task failed: {}", e);
        }
    }
}

/// Process-wide holder for the optional broadcast channel.
///
/// Starts empty; the host attaches a channel once at startup. Senders check
/// the slot on every send, and an empty slot is a normal condition.
#[derive(Default)]
pub struct BroadcastSlot {
    channel: OnceLock<BroadcastChannel>,
}

impl BroadcastSlot {
    pub const fn new() -> Self {
        Self {
            channel: OnceLock::new(),
        }
    }

    /// Attaches `channel`. Hands it back if a channel is already attached.
    pub fn attach(&self, channel: BroadcastChannel) -> Result<(), BroadcastChannel> {
        self.channel.set(channel)
    }

    pub fn get(&self) -> Option<&BroadcastChannel> {
        self.channel.get()
    }

    pub fn is_attached(&self) -> bool {
        self.channel.get().is_some()
    }

    pub fn send(&self, signal: Signal) -> Result<usize, BroadcastDeliveryError> {
        self.channel
            .get()
            .ok_or(BroadcastDeliveryError::NoChannel)?
            .broadcast(signal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::mpsc;

    struct Forward(mpsc::UnboundedSender<Signal>);

    #[async_trait]
    impl SignalRecipient for Forward {
        async fn on_signal(&self, signal: Signal) {
            let _ = self.0.send(signal);
        }
    }

    #[test]
    fn test_broadcast_without_observers() {
        let channel = BroadcastChannel::new();
        assert_eq!(
            channel.broadcast(Signal::Activity),
            Err(BroadcastDeliveryError::NoRecipients)
        );
    }

    #[tokio::test]
    async fn test_zero_capacity_is_clamped() {
        let channel = BroadcastChannel::with_capacity(0);
        let mut rx = channel.subscribe();

        assert_eq!(channel.broadcast(Signal::Activity), Ok(1));
        assert_eq!(rx.recv().await.unwrap(), Signal::Activity);
    }

    #[test]
    fn test_empty_slot() {
        let slot = BroadcastSlot::new();
        assert!(!slot.is_attached());
        assert_eq!(
            slot.send(Signal::Activity),
            Err(BroadcastDeliveryError::NoChannel)
        );
    }

    #[test]
    fn test_slot_attaches_once() {
        let slot = BroadcastSlot::new();
        assert!(slot.attach(BroadcastChannel::new()).is_ok());
        assert!(slot.attach(BroadcastChannel::new()).is_err());
        assert!(slot.is_attached());
    }

    #[tokio::test]
    async fn test_every_observer_receives() {
        let channel = BroadcastChannel::new();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        let a = channel.spawn_observer(Arc::new(Forward(tx_a)));
        let b = channel.spawn_observer(Arc::new(Forward(tx_b)));

        assert_eq!(channel.broadcast(Signal::Activity), Ok(2));
        assert_eq!(channel.acknowledge(), Ok(2));

        for rx in [&mut rx_a, &mut rx_b] {
            assert_eq!(rx.recv().await, Some(Signal::Activity));
            assert_eq!(rx.recv().await, Some(Signal::Cleared));
        }

        a.stop();
        b.stop();
        a.join().await;
        b.join().await;
    }

    #[tokio::test]
    async fn test_stopped_observer_unregisters() {
        let channel = BroadcastChannel::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let handle = channel.spawn_observer(Arc::new(Forward(tx)));
        assert_eq!(channel.observer_count(), 1);

        handle.stop();
        tokio::time::timeout(Duration::from_secs(1), handle.join())
            .await
            .unwrap();

        assert_eq!(channel.observer_count(), 0);
    }

    #[tokio::test]
    async fn test_lagging_observer_keeps_going() {
        let channel = BroadcastChannel::with_capacity(1);
        let mut rx = channel.subscribe();

        channel.broadcast(Signal::Activity).unwrap();
        channel.broadcast(Signal::Cleared).unwrap();

        assert!(matches!(rx.recv().await, Err(RecvError::Lagged(1))));
        assert_eq!(rx.recv().await.unwrap(), Signal::Cleared);
    }
}
