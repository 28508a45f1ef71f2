//! Composition root: wires stores, tracker client and services.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use ytn_application::{
    AlertActivation, AlertEmitter, BroadcastChannel, BroadcastSlot, DedupStore,
    NotificationPipeline, Poller,
};
use ytn_core::config::NotifierSettings;
use ytn_infrastructure::paths::YtnPaths;
use ytn_infrastructure::{InMemoryKeyValueStore, SettingsService, TomlKeyValueStore};
use ytn_interaction::YouTrackClient;

use crate::host::{LogAlertSink, LogNavigator};

pub struct App {
    pub settings: NotifierSettings,
    pub durable: Arc<TomlKeyValueStore>,
    pub session: Arc<InMemoryKeyValueStore>,
    pub broadcast: Arc<BroadcastSlot>,
}

impl App {
    pub async fn build(config_dir: Option<&Path>) -> Result<Self> {
        let paths = YtnPaths::new(config_dir);

        let settings_service = SettingsService::from_paths(&paths)
            .map_err(|e| anyhow!("Failed to resolve settings file: {}", e))?;
        let settings = settings_service.load().await?;

        let store_file = SettingsService::resolve_store_file(&settings, &paths)?;
        tracing::info!("[Bootstrap] Durable store at {:?}", store_file);

        Ok(Self {
            settings,
            durable: Arc::new(TomlKeyValueStore::new(store_file)),
            session: Arc::new(InMemoryKeyValueStore::new()),
            broadcast: Arc::new(BroadcastSlot::new()),
        })
    }

    /// Attaches the process broadcast channel. Only long-running hosts have
    /// observers, so one-shot commands leave the slot empty.
    pub fn attach_broadcast(&self) -> Result<BroadcastChannel> {
        let channel = BroadcastChannel::new();
        self.broadcast
            .attach(channel.clone())
            .map_err(|_| anyhow!("Broadcast channel already attached"))?;
        Ok(channel)
    }

    pub fn poller(&self) -> Poller {
        let client = YouTrackClient::new().with_timeout(self.settings.request_timeout());
        let emitter = AlertEmitter::new(
            Arc::new(LogAlertSink),
            Arc::clone(&self.broadcast),
            self.settings.icon_ref.clone(),
        );
        let pipeline = NotificationPipeline::new(DedupStore::new(self.session.clone()), emitter);

        Poller::new(
            self.durable.clone(),
            Arc::new(client),
            pipeline,
            self.settings.poll_interval(),
        )
    }

    pub fn activation(&self) -> AlertActivation {
        AlertActivation::new(self.durable.clone(), Arc::new(LogNavigator))
    }
}
