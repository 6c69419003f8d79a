use crate::transaction::TransactionError;

/// Error type for stock ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("item not found: {0}")]
    ItemNotFound(String),

    /// The movement would drive a residence below zero.
    #[error(
        "insufficient stock for item {item_id} at {residence_id}: available {available}, requested {requested}"
    )]
    InsufficientStock {
        item_id: String,
        residence_id: String,
        available: i64,
        requested: i64,
    },

    /// A quantity or total would leave the `i64` range.
    #[error("quantity out of range for item {item_id} at {residence_id}")]
    QuantityOverflow {
        item_id: String,
        residence_id: String,
    },

    #[error(transparent)]
    Transaction(#[from] TransactionError),
}

impl LedgerError {
    pub(crate) fn overflow(item_id: &str, residence_id: &str) -> Self {
        LedgerError::QuantityOverflow {
            item_id: item_id.to_string(),
            residence_id: residence_id.to_string(),
        }
    }
}
