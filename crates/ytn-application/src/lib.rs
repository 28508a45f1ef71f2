//! Services that drive the notifier: polling, the per-item pipeline, alert
//! emission and observer fan-out.

pub mod activation;
pub mod alert_emitter;
pub mod broadcast_channel;
pub mod dedup_store;
pub mod indicator;
pub mod pipeline;
pub mod poller;

pub use activation::AlertActivation;
pub use alert_emitter::AlertEmitter;
pub use broadcast_channel::{BroadcastChannel, BroadcastSlot, ObserverHandle};
pub use dedup_store::{DedupBatch, DedupStore};
pub use indicator::{ActivityIndicator, IndicatorState};
pub use pipeline::{BatchReport, NotificationPipeline};
pub use poller::{CycleOutcome, CycleReport, Poller, PollerHandle, PollerState};
