//! Storage backends for the two key-value scopes.

mod memory_store;
mod toml_store;

pub use memory_store::InMemoryKeyValueStore;
pub use toml_store::{TomlKeyValueStore, TomlStoreError};
