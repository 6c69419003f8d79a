use crate::ledger::LedgerError;
use crate::store::StoreError;
use crate::transaction::TransactionError;

/// Error type for workflow actions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    /// Malformed or inconsistent input, rejected before any write.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error(
        "insufficient stock for item {item_id} at {residence_id}: available {available}, requested {requested}"
    )]
    InsufficientStock {
        item_id: String,
        residence_id: String,
        available: i64,
        requested: i64,
    },

    /// The actor may not act on this residence or command.
    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("{collection}/{id} not found")]
    NotFound { collection: String, id: String },

    #[error("{collection}/{id} already exists")]
    AlreadyExists { collection: String, id: String },

    /// The document's current status does not allow the action.
    #[error("cannot {action} {id}: status is {status}")]
    InvalidState {
        id: String,
        status: String,
        action: &'static str,
    },

    /// Retry budget exhausted; nothing was written and the request may be retried.
    #[error("transaction contention after {attempts} attempts")]
    Contention { attempts: u32 },

    #[error("storage error: {0}")]
    Store(StoreError),
}

impl WorkflowError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        WorkflowError::Validation(message.into())
    }

    pub(crate) fn not_found(collection: &str, id: &str) -> Self {
        WorkflowError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }
}

impl From<TransactionError> for WorkflowError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::Contention { attempts } => WorkflowError::Contention { attempts },
            TransactionError::NotFound { collection, id } => {
                WorkflowError::NotFound { collection, id }
            }
            TransactionError::AlreadyExists { collection, id } => {
                WorkflowError::AlreadyExists { collection, id }
            }
            TransactionError::Store(err) => WorkflowError::Store(err),
        }
    }
}

impl From<LedgerError> for WorkflowError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::ItemNotFound(id) => WorkflowError::not_found("items", &id),
            LedgerError::InsufficientStock {
                item_id,
                residence_id,
                available,
                requested,
            } => WorkflowError::InsufficientStock {
                item_id,
                residence_id,
                available,
                requested,
            },
            err @ LedgerError::QuantityOverflow { .. } => WorkflowError::Validation(err.to_string()),
            LedgerError::Transaction(err) => err.into(),
        }
    }
}

impl From<StoreError> for WorkflowError {
    fn from(err: StoreError) -> Self {
        WorkflowError::Store(err)
    }
}
