use std::collections::BTreeMap;

use crate::store::{
    decode, document_key, encode, Document, DocumentStore, RawDocument, WriteBatch, ABSENT,
};

use super::TransactionError;

/// A read set plus buffered writes against one store.
///
/// Reads observe the transaction's own buffered writes first, then the store.
/// The first version observed for a key is the one the commit is checked
/// against.
pub struct Transaction<'a, S> {
    store: &'a S,
    read_set: BTreeMap<String, u64>,
    writes: BTreeMap<String, Vec<u8>>,
}

impl<'a, S: DocumentStore> Transaction<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            read_set: BTreeMap::new(),
            writes: BTreeMap::new(),
        }
    }

    /// Read a document, recording its version in the read set.
    pub fn get<D: Document>(&mut self, id: &str) -> Result<Option<D>, TransactionError> {
        let key = document_key(D::COLLECTION, id);
        if let Some(bytes) = self.writes.get(&key) {
            return Ok(Some(serde_json::from_slice(bytes)?));
        }

        let raw = self.read_key(&key)?;
        match raw {
            Some(raw) => Ok(Some(decode::<D>(&raw)?.data)),
            None => Ok(None),
        }
    }

    /// Read a document that must exist.
    pub fn require<D: Document>(&mut self, id: &str) -> Result<D, TransactionError> {
        self.get(id)?.ok_or_else(|| TransactionError::NotFound {
            collection: D::COLLECTION.to_string(),
            id: id.to_string(),
        })
    }

    /// Read every document of a collection, ordered by id.
    ///
    /// Each listed key joins the read set; documents inserted concurrently
    /// by other transactions are not detected.
    pub fn list<D: Document>(&mut self) -> Result<Vec<D>, TransactionError> {
        let mut by_id: BTreeMap<String, D> = BTreeMap::new();
        for (id, raw) in self.store.list_raw(D::COLLECTION)? {
            let key = document_key(D::COLLECTION, &id);
            self.read_set.entry(key).or_insert(raw.version);
            by_id.insert(id, decode::<D>(&raw)?.data);
        }

        let prefix = format!("{}/", D::COLLECTION);
        for (key, bytes) in &self.writes {
            if let Some(id) = key.strip_prefix(&prefix) {
                by_id.insert(id.to_string(), serde_json::from_slice(bytes)?);
            }
        }

        Ok(by_id.into_values().collect())
    }

    /// Buffer a full write of `document`.
    pub fn set<D: Document>(&mut self, document: &D) -> Result<(), TransactionError> {
        let key = document_key(D::COLLECTION, document.id());
        self.writes.insert(key, encode(document)?);
        Ok(())
    }

    /// Buffer the write of a document that must not exist yet.
    pub fn create<D: Document>(&mut self, document: &D) -> Result<(), TransactionError> {
        let key = document_key(D::COLLECTION, document.id());
        let exists = self.writes.contains_key(&key) || self.read_key(&key)?.is_some();
        if exists {
            return Err(TransactionError::AlreadyExists {
                collection: D::COLLECTION.to_string(),
                id: document.id().to_string(),
            });
        }
        self.writes.insert(key, encode(document)?);
        Ok(())
    }

    pub(crate) fn into_batch(self) -> WriteBatch {
        WriteBatch {
            preconditions: self.read_set,
            writes: self.writes,
        }
    }

    fn read_key(&mut self, key: &str) -> Result<Option<RawDocument>, TransactionError> {
        let raw = self.store.get_raw(key)?;
        let version = raw.as_ref().map(|r| r.version).unwrap_or(ABSENT);
        self.read_set.entry(key.to_string()).or_insert(version);
        Ok(raw)
    }
}
