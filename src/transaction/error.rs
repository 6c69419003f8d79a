use crate::store::StoreError;

/// Error type for transaction operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransactionError {
    /// Every attempt lost a version race.
    #[error("transaction aborted after {attempts} conflicting attempts")]
    Contention { attempts: u32 },

    /// A required document does not exist.
    #[error("document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    /// `create` targeted a document that already exists.
    #[error("document already exists: {collection}/{id}")]
    AlreadyExists { collection: String, id: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<serde_json::Error> for TransactionError {
    fn from(err: serde_json::Error) -> Self {
        TransactionError::Store(err.into())
    }
}
