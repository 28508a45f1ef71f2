pub mod paths;
pub mod settings_service;
pub mod storage;

pub use crate::settings_service::SettingsService;
pub use crate::storage::{InMemoryKeyValueStore, TomlKeyValueStore};
