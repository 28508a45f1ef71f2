//! Poller - scheduling loop around fetch and [`NotificationPipeline`].
//!
//! Runs one cycle immediately, then one per interval tick, plus one per
//! manual trigger. Cycles run on a single task and never overlap.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use ytn_core::NotifierError;
use ytn_core::config::TrackerCredentials;
use ytn_core::error::Result;
use ytn_core::storage::KeyValueStore;
use ytn_core::tracker::NotificationSource;

use crate::pipeline::{BatchReport, NotificationPipeline};

/// Observable poller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollerState {
    #[default]
    Idle,
    Fetching,
    Processing,
    /// Tracker credentials are missing; re-checked every cycle
    Disabled,
}

#[derive(Debug, Clone)]
pub enum CycleOutcome {
    /// Nothing was fetched; carries the `ConfigMissing` error naming the key
    Disabled(NotifierError),
    FetchFailed(NotifierError),
    /// Reading credentials or the dedup record failed
    StoreFailed(NotifierError),
    Processed(BatchReport),
}

/// Result of one poll cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub outcome: CycleOutcome,
    pub elapsed: Duration,
}

impl CycleReport {
    /// Alerts displayed during the cycle.
    pub fn alerted(&self) -> usize {
        match &self.outcome {
            CycleOutcome::Processed(report) => report.alerted,
            _ => 0,
        }
    }
}

pub struct Poller {
    durable: Arc<dyn KeyValueStore>,
    source: Arc<dyn NotificationSource>,
    pipeline: NotificationPipeline,
    interval: Duration,
    state: watch::Sender<PollerState>,
}

impl Poller {
    pub fn new(
        durable: Arc<dyn KeyValueStore>,
        source: Arc<dyn NotificationSource>,
        pipeline: NotificationPipeline,
        interval: Duration,
    ) -> Self {
        let (state, _) = watch::channel(PollerState::Idle);
        Self {
            durable,
            source,
            pipeline,
            interval,
            state,
        }
    }

    pub fn state(&self) -> PollerState {
        *self.state.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<PollerState> {
        self.state.subscribe()
    }

    /// Runs a single poll cycle.
    ///
    /// Credentials are read first; when they are missing nothing else is
    /// touched.
    pub async fn run_cycle(&mut self) -> CycleReport {
        let started = Instant::now();
        let outcome = self.cycle().await;

        self.set_state(match outcome {
            CycleOutcome::Disabled(_) => PollerState::Disabled,
            _ => PollerState::Idle,
        });

        CycleReport {
            outcome,
            elapsed: started.elapsed(),
        }
    }

    async fn cycle(&mut self) -> CycleOutcome {
        let credentials = match TrackerCredentials::require(self.durable.as_ref()).await {
            Ok(credentials) => credentials,
            Err(e) if e.is_config_missing() => {
                tracing::debug!("[Poller] {}, skipping cycle", e);
                return CycleOutcome::Disabled(e);
            }
            Err(e) => {
                tracing::warn!("[Poller] Failed to read credentials: {}", e);
                return CycleOutcome::StoreFailed(e);
            }
        };

        self.set_state(PollerState::Fetching);
        let notifications = match self.source.fetch_notifications(&credentials).await {
            Ok(notifications) => notifications,
            Err(e) => {
                tracing::warn!(host = %credentials.tracker_host, "[Poller] Fetch failed: {}", e);
                return CycleOutcome::FetchFailed(e);
            }
        };

        self.set_state(PollerState::Processing);
        match self.pipeline.process_batch(notifications).await {
            Ok(report) => CycleOutcome::Processed(report),
            Err(e) => {
                tracing::warn!("[Poller] Failed to process batch: {}", e);
                CycleOutcome::StoreFailed(e)
            }
        }
    }

    fn set_state(&self, next: PollerState) {
        self.state.send_if_modified(|state| {
            if *state == next {
                return false;
            }
            *state = next;
            true
        });
    }

    /// Moves the poller onto its own task.
    pub fn spawn(mut self) -> PollerHandle {
        let cancel = CancellationToken::new();
        let trigger = Arc::new(Notify::new());
        let state = self.state.subscribe();
        let (report_tx, reports) = watch::channel(None);

        let token = cancel.clone();
        let wake = Arc::clone(&trigger);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::info!("[Poller] Started, interval {:?}", self.interval);

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {}
                    _ = wake.notified() => {
                        tracing::debug!("[Poller] Manual trigger");
                    }
                }

                let report = self.run_cycle().await;
                report_tx.send_replace(Some(report));
            }

            tracing::info!("[Poller] Stopped");
        });

        PollerHandle {
            cancel,
            trigger,
            state,
            reports,
            task,
        }
    }
}

/// Control surface of a spawned [`Poller`].
pub struct PollerHandle {
    cancel: CancellationToken,
    trigger: Arc<Notify>,
    state: watch::Receiver<PollerState>,
    reports: watch::Receiver<Option<CycleReport>>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Stops the loop. A cycle already running finishes first.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Requests an extra cycle as soon as the current one (if any) ends.
    pub fn trigger(&self) {
        self.trigger.notify_one();
    }

    pub fn state(&self) -> PollerState {
        *self.state.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<PollerState> {
        self.state.clone()
    }

    /// Follows the report of the latest finished cycle.
    pub fn reports(&self) -> watch::Receiver<Option<CycleReport>> {
        self.reports.clone()
    }

    pub async fn join(self) -> Result<()> {
        self.task
            .await
            .map_err(|e| NotifierError::internal(format!("Poller task failed: {}", e)))
    }
}
