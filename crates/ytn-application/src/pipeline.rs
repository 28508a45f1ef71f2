//! Per-cycle processing of fetched notifications.

use ytn_core::alert::AlertHandle;
use ytn_core::error::Result;
use ytn_core::notification::Notification;
use ytn_core::payload::{self, DecodeError};
use ytn_core::parser;

use crate::alert_emitter::AlertEmitter;
use crate::dedup_store::DedupStore;

/// Counts for one processed batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub alerted: usize,
    pub already_seen: usize,
    pub failed: usize,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.alerted + self.already_seen + self.failed
    }
}

/// Dedup check, decode, parse and emit for each notification, in order.
pub struct NotificationPipeline {
    dedup: DedupStore,
    emitter: AlertEmitter,
}

impl NotificationPipeline {
    pub fn new(dedup: DedupStore, emitter: AlertEmitter) -> Self {
        Self { dedup, emitter }
    }

    /// Processes a fetched batch.
    ///
    /// Item failures are logged and counted; they never abort the batch.
    /// Only storage failures surface as `Err`. Every processed id is marked
    /// seen, failed ones included, and written back once after the last item.
    pub async fn process_batch(&self, notifications: Vec<Notification>) -> Result<BatchReport> {
        let mut seen = self.dedup.begin().await?;
        let mut report = BatchReport::default();

        for notification in &notifications {
            if seen.has_seen(&notification.id) {
                report.already_seen += 1;
                continue;
            }

            // Marked whatever the outcome; a payload never changes between polls
            seen.mark_seen(&notification.id);

            match self.process_item(notification).await {
                Ok(handle) => {
                    tracing::debug!(
                        notification_id = %notification.id,
                        issue_id = %handle.issue_id(),
                        "[Pipeline] Alert displayed"
                    );
                    report.alerted += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        notification_id = %notification.id,
                        "[Pipeline] Skipping notification: {}",
                        e
                    );
                    report.failed += 1;
                }
            }
        }

        seen.flush().await?;

        tracing::info!(
            alerted = report.alerted,
            already_seen = report.already_seen,
            failed = report.failed,
            "[Pipeline] Batch processed"
        );
        Ok(report)
    }

    async fn process_item(&self, notification: &Notification) -> Result<AlertHandle> {
        let encoded = notification
            .content
            .as_deref()
            .ok_or(DecodeError::MissingContent)?;
        let text = payload::decode(encoded)?;
        let parsed = parser::parse(&text)?;
        self.emitter.emit(&parsed).await
    }
}
