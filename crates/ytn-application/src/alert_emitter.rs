//! AlertEmitter - turns a parsed notification into a user-visible alert.

use std::sync::Arc;

use ytn_core::alert::{AlertContent, AlertHandle, AlertSink};
use ytn_core::broadcast::Signal;
use ytn_core::error::Result;
use ytn_core::notification::ParsedNotification;

use crate::broadcast_channel::BroadcastSlot;

pub struct AlertEmitter {
    sink: Arc<dyn AlertSink>,
    broadcast: Arc<BroadcastSlot>,
    icon_ref: String,
}

impl AlertEmitter {
    pub fn new(
        sink: Arc<dyn AlertSink>,
        broadcast: Arc<BroadcastSlot>,
        icon_ref: impl Into<String>,
    ) -> Self {
        Self {
            sink,
            broadcast,
            icon_ref: icon_ref.into(),
        }
    }

    /// Displays an alert for `parsed` and signals `activity` to observers.
    ///
    /// The broadcast is attempted even when the display fails; the display
    /// error is returned afterwards.
    pub async fn emit(&self, parsed: &ParsedNotification) -> Result<AlertHandle> {
        let handle = AlertHandle::for_issue(&parsed.issue_id);
        let content = AlertContent {
            title: parsed.issue_id.clone(),
            message: parsed.formatted_message.clone(),
            icon_ref: self.icon_ref.clone(),
            clickable: true,
        };

        let displayed = self.sink.create(&handle.to_string(), &content).await;

        match self.broadcast.send(Signal::Activity) {
            Ok(reached) => tracing::debug!("[AlertEmitter] Activity sent to {} observer(s)", reached),
            Err(e) => tracing::debug!("[AlertEmitter] Activity not broadcast: {}", e),
        }

        displayed?;
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use ytn_core::NotifierError;

    use crate::broadcast_channel::BroadcastChannel;

    #[derive(Default)]
    struct RecordingSink {
        created: Mutex<Vec<(String, AlertContent)>>,
        fail: bool,
    }

    #[async_trait]
    impl AlertSink for RecordingSink {
        async fn create(&self, handle: &str, alert: &AlertContent) -> Result<()> {
            if self.fail {
                return Err(NotifierError::alert_delivery("display refused"));
            }
            self.created
                .lock()
                .unwrap()
                .push((handle.to_string(), alert.clone()));
            Ok(())
        }
    }

    fn parsed() -> ParsedNotification {
        ParsedNotification {
            issue_id: "ABC-123".to_string(),
            formatted_message: "Hello\nWorld".to_string(),
        }
    }

    #[tokio::test]
    async fn test_emit_builds_alert() {
        let sink = Arc::new(RecordingSink::default());
        let emitter = AlertEmitter::new(sink.clone(), Arc::new(BroadcastSlot::new()), "icon.png");

        let handle = emitter.emit(&parsed()).await.unwrap();

        let created = sink.created.lock().unwrap();
        assert_eq!(created.len(), 1);
        let (raw, content) = &created[0];
        assert_eq!(raw, &handle.to_string());
        assert!(raw.ends_with(":issue:ABC-123"));
        assert_eq!(content.title, "ABC-123");
        assert_eq!(content.message, "Hello\nWorld");
        assert_eq!(content.icon_ref, "icon.png");
        assert!(content.clickable);
    }

    #[tokio::test]
    async fn test_emit_broadcasts_activity() {
        let slot = Arc::new(BroadcastSlot::new());
        let channel = BroadcastChannel::new();
        let mut rx = channel.subscribe();
        slot.attach(channel).ok();

        let emitter = AlertEmitter::new(Arc::new(RecordingSink::default()), slot, "icon.png");
        emitter.emit(&parsed()).await.unwrap();

        assert_eq!(rx.try_recv().unwrap(), Signal::Activity);
    }

    #[tokio::test]
    async fn test_display_failure_still_broadcasts() {
        let slot = Arc::new(BroadcastSlot::new());
        let channel = BroadcastChannel::new();
        let mut rx = channel.subscribe();
        slot.attach(channel).ok();

        let sink = Arc::new(RecordingSink {
            fail: true,
            ..Default::default()
        });
        let emitter = AlertEmitter::new(sink, slot, "icon.png");

        let err = emitter.emit(&parsed()).await.unwrap_err();
        assert!(err.is_item_failure());
        assert_eq!(rx.try_recv().unwrap(), Signal::Activity);
    }
}
