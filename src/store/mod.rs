//! Document store - versioned, collection-scoped storage for typed documents.
//!
//! Every stored document carries a version that starts at 1 and increments on
//! each write. Writes are applied through [`WriteBatch`]es whose preconditions
//! pin the version each key must still have; a batch commits completely or not
//! at all. This is the primitive the optimistic [`crate::transaction`] layer is
//! built on.
//!
//! ## Example
//!
//! ```ignore
//! use estatecare::{Document, DocumentsExt, InMemoryDocumentStore};
//!
//! #[derive(Serialize, Deserialize, Clone, Document)]
//! #[document(collection = "residences")]
//! struct Residence {
//!     pub id: String,
//!     pub name: String,
//! }
//!
//! let store = InMemoryDocumentStore::new();
//! store.documents::<Residence>().save(&residence)?;
//! let loaded = store.documents::<Residence>().get("res-1")?;
//! ```

mod collection;
mod in_memory;
mod store;

use std::collections::BTreeMap;

use serde::{de::DeserializeOwned, Serialize};

/// Trait for types that can be stored as documents.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// The collection this document type lives in (e.g. "items", "counters").
    const COLLECTION: &'static str;

    /// Returns the unique identifier of this document within its collection.
    fn id(&self) -> &str;
}

/// A document together with the version it was read at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned<T> {
    pub data: T,
    pub version: u64,
}

/// Serialized document bytes plus their version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pub bytes: Vec<u8>,
    pub version: u64,
}

/// Version recorded for a key that did not exist when it was read.
pub const ABSENT: u64 = 0;

/// Storage key for a document: `"collection/id"`.
pub fn document_key(collection: &str, id: &str) -> String {
    format!("{}/{}", collection, id)
}

/// Errors raised by document stores.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A batch precondition no longer holds.
    #[error("version conflict on {key} (expected version {expected}, actual {actual})")]
    Conflict {
        key: String,
        expected: u64,
        actual: u64,
    },

    #[error("document serialization error: {0}")]
    Serde(String),

    #[error("document storage error: {0}")]
    Storage(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serde(err.to_string())
    }
}

/// A set of writes applied atomically once every precondition holds.
///
/// `preconditions` maps a key to the version it must currently have
/// ([`ABSENT`] meaning the key must not exist). Keys are ordered so that
/// conflict reporting is deterministic.
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    pub preconditions: BTreeMap<String, u64>,
    pub writes: BTreeMap<String, Vec<u8>>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `key` to be at `version` when the batch commits.
    pub fn expect(&mut self, key: impl Into<String>, version: u64) -> &mut Self {
        self.preconditions.insert(key.into(), version);
        self
    }

    /// Stage a full replacement of the document stored at `key`.
    pub fn put(&mut self, key: impl Into<String>, bytes: Vec<u8>) -> &mut Self {
        self.writes.insert(key.into(), bytes);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

pub(crate) fn decode<D: Document>(raw: &RawDocument) -> Result<Versioned<D>, StoreError> {
    let data = serde_json::from_slice(&raw.bytes)?;
    Ok(Versioned {
        data,
        version: raw.version,
    })
}

pub(crate) fn encode<D: Document>(document: &D) -> Result<Vec<u8>, StoreError> {
    Ok(serde_json::to_vec(document)?)
}

pub use collection::{Collection, DocumentsExt};
pub use in_memory::InMemoryDocumentStore;
pub use store::DocumentStore;
