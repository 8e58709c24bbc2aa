//! In-memory item store
//!
//! HashMap behind an RwLock. The reference backend for tests and
//! single-process deployments.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::item::{AttributeMerge, Item};

use super::errors::{StorageError, StorageResult};
use super::ItemStore;

/// In-memory [`ItemStore`] implementation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RwLock<HashMap<String, Item>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ItemStore for MemoryStore {
    fn get(&self, item_id: &str) -> StorageResult<Option<Item>> {
        let items = self.items.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(items.get(item_id).cloned())
    }

    fn put(&self, item: Item) -> StorageResult<()> {
        let mut items = self.items.write().map_err(|_| StorageError::LockPoisoned)?;
        items.insert(item.item_id.clone(), item);
        Ok(())
    }

    fn update(&self, item_id: &str, merge: AttributeMerge) -> StorageResult<()> {
        let mut items = self.items.write().map_err(|_| StorageError::LockPoisoned)?;
        // A merge on a key deleted since the caller's existence check is a
        // no-op: the accepted weak-consistency window.
        if let Some(item) = items.get_mut(item_id) {
            item.apply(&merge);
        }
        Ok(())
    }

    fn delete(&self, item_id: &str) -> StorageResult<()> {
        let mut items = self.items.write().map_err(|_| StorageError::LockPoisoned)?;
        items.remove(item_id);
        Ok(())
    }
}
