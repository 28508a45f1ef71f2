//! Session-scoped record of notifications that already produced an alert.
//!
//! A poll cycle reads the record once with [`DedupStore::begin`], checks and
//! marks ids on the in-memory [`DedupBatch`], then writes it back once with
//! [`DedupBatch::flush`]. A crash between an alert and the flush can repeat
//! that alert on the next cycle.

use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use ytn_core::error::Result;
use ytn_core::storage::{KeyValueStore, keys};

/// Entry point to the dedup record in the session store.
#[derive(Clone)]
pub struct DedupStore {
    store: Arc<dyn KeyValueStore>,
}

impl DedupStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Loads the record with a single storage read.
    ///
    /// An absent key is an empty record. A value that is not a list of
    /// strings is logged and also treated as empty.
    pub async fn begin(&self) -> Result<DedupBatch> {
        let stored = self.store.get(keys::DISPLAYED_NOTIFICATIONS).await?;

        let ids = match stored {
            None => Vec::new(),
            Some(value) => serde_json::from_value::<Vec<String>>(value).unwrap_or_else(|e| {
                tracing::warn!(
                    "[DedupStore] Ignoring unreadable {} record: {}",
                    keys::DISPLAYED_NOTIFICATIONS,
                    e
                );
                Vec::new()
            }),
        };

        Ok(DedupBatch {
            store: Arc::clone(&self.store),
            seen: ids.iter().cloned().collect(),
            ids,
            dirty: false,
        })
    }

    /// Returns whether `id` is recorded, reading storage directly.
    pub async fn contains(&self, id: &str) -> Result<bool> {
        Ok(self.begin().await?.has_seen(id))
    }
}

/// In-memory view of the record for one poll cycle.
pub struct DedupBatch {
    store: Arc<dyn KeyValueStore>,
    /// Insertion order, as persisted
    ids: Vec<String>,
    seen: HashSet<String>,
    dirty: bool,
}

impl DedupBatch {
    pub fn has_seen(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    /// Buffers `id`; nothing is written until [`flush`](Self::flush).
    pub fn mark_seen(&mut self, id: &str) {
        if self.seen.insert(id.to_string()) {
            self.ids.push(id.to_string());
            self.dirty = true;
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Writes the record back with a single storage write.
    ///
    /// Skips the write when nothing new was marked.
    pub async fn flush(self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }

        tracing::debug!("[DedupStore] Flushing {} seen id(s)", self.ids.len());
        let value = Value::from(self.ids);
        self.store.set(keys::DISPLAYED_NOTIFICATIONS, value).await
    }
}
