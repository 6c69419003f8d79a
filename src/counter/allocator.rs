use serde::{Deserialize, Serialize};

use crate::store::DocumentStore;
use crate::transaction::{Transaction, TransactionError};
use crate::Document;

use super::{DocumentId, DocumentKind, Period};

/// Per-type, per-month sequence document (`counters/mrv-25-08`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Document)]
#[document(collection = "counters")]
pub struct Counter {
    pub id: String,
    pub seq: u64,
}

/// Reserve the next sequence number for `kind` in `period`.
///
/// Must be called inside the same transaction as the writes that use the
/// returned id, so a failed workflow never consumes a number that becomes
/// visible. A missing counter document counts as zero.
pub fn reserve<S: DocumentStore>(
    tx: &mut Transaction<'_, S>,
    kind: DocumentKind,
    period: Period,
) -> Result<DocumentId, TransactionError> {
    let counter_id = period.counter_id(kind);
    let current = tx
        .get::<Counter>(&counter_id)?
        .map(|counter| counter.seq)
        .unwrap_or(0);

    let next = current + 1;
    tx.set(&Counter {
        id: counter_id,
        seq: next,
    })?;

    Ok(DocumentId { kind, period, seq: next })
}
