//! Collection - typed accessor for one document type.

use std::marker::PhantomData;

use super::{Document, DocumentStore, StoreError, Versioned};

/// Typed wrapper for accessing documents of a specific type.
pub struct Collection<'a, S, D> {
    store: &'a S,
    _marker: PhantomData<D>,
}

impl<'a, S: DocumentStore, D: Document> Collection<'a, S, D> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    pub fn get(&self, id: &str) -> Result<Option<Versioned<D>>, StoreError> {
        self.store.get_document(id)
    }

    /// Upsert without a version check.
    pub fn save(&self, document: &D) -> Result<(), StoreError> {
        self.store.save_document(document)
    }

    /// Insert a new document. Fails if it already exists.
    pub fn insert(&self, document: &D) -> Result<(), StoreError> {
        self.store.insert_document(document)
    }

    pub fn find(&self, predicate: &dyn Fn(&D) -> bool) -> Result<Vec<Versioned<D>>, StoreError> {
        self.store.find_documents(predicate)
    }

    pub fn all(&self) -> Result<Vec<Versioned<D>>, StoreError> {
        self.store.find_documents(&|_| true)
    }
}

/// Extension trait for typed collection access on any DocumentStore.
pub trait DocumentsExt: DocumentStore + Sized {
    fn documents<D: Document>(&self) -> Collection<'_, Self, D> {
        Collection::new(self)
    }
}

impl<S: DocumentStore> DocumentsExt for S {}
