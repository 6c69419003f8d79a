//! DocumentStore - abstract versioned storage.

use super::{decode, document_key, encode, Document, RawDocument, StoreError, Versioned, WriteBatch};

/// Abstract versioned document storage.
///
/// Implementors supply the raw primitives; the typed helpers are provided.
/// `commit` must be atomic: either every precondition holds and every write
/// lands, or nothing changes.
pub trait DocumentStore: Send + Sync {
    /// Read the raw document at `key`.
    fn get_raw(&self, key: &str) -> Result<Option<RawDocument>, StoreError>;

    /// List `(id, document)` pairs of a collection, ordered by id.
    fn list_raw(&self, collection: &str) -> Result<Vec<(String, RawDocument)>, StoreError>;

    /// Apply a batch atomically after checking its preconditions.
    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError>;

    /// Get a typed document by id.
    fn get_document<D: Document>(&self, id: &str) -> Result<Option<Versioned<D>>, StoreError>
    where
        Self: Sized,
    {
        self.get_raw(&document_key(D::COLLECTION, id))?
            .map(|raw| decode(&raw))
            .transpose()
    }

    /// All documents of a collection matching `predicate`.
    fn find_documents<D: Document>(
        &self,
        predicate: &dyn Fn(&D) -> bool,
    ) -> Result<Vec<Versioned<D>>, StoreError>
    where
        Self: Sized,
    {
        let mut results = Vec::new();
        for (_, raw) in self.list_raw(D::COLLECTION)? {
            let versioned = decode::<D>(&raw)?;
            if predicate(&versioned.data) {
                results.push(versioned);
            }
        }
        Ok(results)
    }

    /// Upsert a document without a version check.
    fn save_document<D: Document>(&self, document: &D) -> Result<(), StoreError>
    where
        Self: Sized,
    {
        let mut batch = WriteBatch::new();
        batch.put(document_key(D::COLLECTION, document.id()), encode(document)?);
        self.commit(batch)
    }

    /// Insert a new document. Fails with a conflict if it already exists.
    fn insert_document<D: Document>(&self, document: &D) -> Result<(), StoreError>
    where
        Self: Sized,
    {
        let key = document_key(D::COLLECTION, document.id());
        let mut batch = WriteBatch::new();
        batch.expect(key.clone(), super::ABSENT);
        batch.put(key, encode(document)?);
        self.commit(batch)
    }
}
