#![allow(dead_code)]

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use ytn_application::{AlertEmitter, BroadcastSlot, DedupStore, NotificationPipeline};
use ytn_core::NotifierError;
use ytn_core::alert::{AlertContent, AlertSink};
use ytn_core::config::TrackerCredentials;
use ytn_core::error::Result;
use ytn_core::navigation::Navigator;
use ytn_core::notification::Notification;
use ytn_core::parser::SECTION_SEPARATOR;
use ytn_core::payload;
use ytn_core::storage::KeyValueStore;
use ytn_core::tracker::NotificationSource;
use ytn_infrastructure::InMemoryKeyValueStore;

/// Encoded body for a well-formed notification about `issue_id`.
pub fn encoded_for(issue_id: &str) -> String {
    let text = format!(
        "\n{SECTION_SEPARATOR}\nHello\nhttps://tracker.example/issue/{issue_id}\nWorld\n{SECTION_SEPARATOR}\nfooter\n"
    );
    payload::encode(&text).unwrap()
}

pub fn notification(id: &str, issue_id: &str) -> Notification {
    Notification::new(id, encoded_for(issue_id))
}

/// Key-value store that counts every call.
#[derive(Clone, Default)]
pub struct CountingStore {
    pub inner: InMemoryKeyValueStore,
    reads: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
}

impl CountingStore {
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyValueStore for CountingStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.remove(key).await
    }
}

/// Notification source returning a fixed list.
#[derive(Default)]
pub struct FakeSource {
    pub notifications: Mutex<Vec<Notification>>,
    pub fail: Mutex<bool>,
    calls: AtomicUsize,
}

impl FakeSource {
    pub fn with(notifications: Vec<Notification>) -> Self {
        Self {
            notifications: Mutex::new(notifications),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotificationSource for FakeSource {
    async fn fetch_notifications(
        &self,
        _credentials: &TrackerCredentials,
    ) -> Result<Vec<Notification>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail.lock().unwrap() {
            return Err(NotifierError::network("connection refused"));
        }
        Ok(self.notifications.lock().unwrap().clone())
    }
}

/// Alert sink recording every alert it was asked to display.
#[derive(Default)]
pub struct RecordingSink {
    pub created: Mutex<Vec<(String, AlertContent)>>,
}

impl RecordingSink {
    pub fn count(&self) -> usize {
        self.created.lock().unwrap().len()
    }

    pub fn titles(&self) -> Vec<String> {
        self.created
            .lock()
            .unwrap()
            .iter()
            .map(|(_, alert)| alert.title.clone())
            .collect()
    }
}

#[async_trait]
impl AlertSink for RecordingSink {
    async fn create(&self, handle: &str, alert: &AlertContent) -> Result<()> {
        self.created
            .lock()
            .unwrap()
            .push((handle.to_string(), alert.clone()));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    pub opened: Mutex<Vec<String>>,
}

#[async_trait]
impl Navigator for RecordingNavigator {
    async fn open(&self, url: &str) -> Result<()> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

pub async fn configure(store: &dyn KeyValueStore) {
    TrackerCredentials::new("perm:token", "tracker.example")
        .save(store)
        .await
        .unwrap();
}

pub struct Harness {
    pub session: CountingStore,
    pub sink: Arc<RecordingSink>,
    pub slot: Arc<BroadcastSlot>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            session: CountingStore::default(),
            sink: Arc::new(RecordingSink::default()),
            slot: Arc::new(BroadcastSlot::new()),
        }
    }

    pub fn dedup(&self) -> DedupStore {
        DedupStore::new(Arc::new(self.session.inner.clone()))
    }

    pub fn pipeline(&self) -> NotificationPipeline {
        let dedup = DedupStore::new(Arc::new(self.session.clone()));
        let emitter = AlertEmitter::new(self.sink.clone(), self.slot.clone(), "icons/test.png");
        NotificationPipeline::new(dedup, emitter)
    }
}

/// One recorded tracing event.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub message: String,
    pub fields: HashMap<String, String>,
}

/// Tracing layer that keeps every event for later assertions.
#[derive(Clone, Default)]
pub struct CapturedLogs {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl CapturedLogs {
    /// Installs the capture as the default subscriber for the current thread.
    pub fn install(&self) -> DefaultGuard {
        tracing::subscriber::set_default(tracing_subscriber::registry().with(self.clone()))
    }

    pub fn at_level(&self, level: Level) -> Vec<CapturedEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|event| event.level == level)
            .cloned()
            .collect()
    }
}

impl<S: Subscriber> Layer<S> for CapturedLogs {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = HashMap::new();
        event.record(&mut FieldVisitor(&mut fields));

        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message: fields.remove("message").unwrap_or_default(),
            fields,
        });
    }
}

struct FieldVisitor<'a>(&'a mut HashMap<String, String>);

impl Visit for FieldVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }
}
