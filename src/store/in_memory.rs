//! InMemoryDocumentStore - HashMap-backed document store.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{DocumentStore, RawDocument, StoreError, WriteBatch, ABSENT};

/// In-memory document store backed by a HashMap.
///
/// Storage key is `"collection/id"`. Clone-friendly via Arc: clones share the
/// same storage, which is how request handlers on different threads observe
/// one store. Batches are checked and applied under a single write lock.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    storage: Arc<RwLock<HashMap<String, RawDocument>>>,
}

impl InMemoryDocumentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents across all collections.
    pub fn len(&self) -> Result<usize, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;
        Ok(storage.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn get_raw(&self, key: &str) -> Result<Option<RawDocument>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;
        Ok(storage.get(key).cloned())
    }

    fn list_raw(&self, collection: &str) -> Result<Vec<(String, RawDocument)>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        let prefix = format!("{}/", collection);
        let mut results: Vec<(String, RawDocument)> = storage
            .iter()
            .filter_map(|(key, raw)| {
                key.strip_prefix(&prefix)
                    .map(|id| (id.to_string(), raw.clone()))
            })
            .collect();
        results.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(results)
    }

    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        for (key, expected) in &batch.preconditions {
            let actual = storage.get(key).map(|raw| raw.version).unwrap_or(ABSENT);
            if actual != *expected {
                return Err(StoreError::Conflict {
                    key: key.clone(),
                    expected: *expected,
                    actual,
                });
            }
        }

        for (key, bytes) in batch.writes {
            let version = storage.get(&key).map(|raw| raw.version + 1).unwrap_or(1);
            storage.insert(key, RawDocument { bytes, version });
        }

        Ok(())
    }
}
