use serde::Deserialize;

use crate::store::{DocumentStore, StoreError};

use super::{Transaction, TransactionError};

/// Retry budget for optimistic transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TransactionOptions {
    /// Total attempts, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_max_attempts() -> u32 {
    5
}

impl Default for TransactionOptions {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
        }
    }
}

impl TransactionOptions {
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }
}

/// Run `body` inside an optimistic transaction, retrying on version conflicts.
///
/// The closure may run several times and must not have side effects outside
/// the transaction. An `Err` from the closure aborts without writing
/// anything. Conflicts on the final attempt surface as
/// [`TransactionError::Contention`].
pub fn run<S, T, E, F>(store: &S, options: &TransactionOptions, mut body: F) -> Result<T, E>
where
    S: DocumentStore,
    E: From<TransactionError>,
    F: FnMut(&mut Transaction<'_, S>) -> Result<T, E>,
{
    let max_attempts = options.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        let mut tx = Transaction::new(store);
        let output = body(&mut tx)?;

        match store.commit(tx.into_batch()) {
            Ok(()) => return Ok(output),
            Err(StoreError::Conflict { key, .. }) if attempt < max_attempts => {
                tracing::debug!(attempt, %key, "transaction conflict, retrying");
                std::thread::yield_now();
            }
            Err(StoreError::Conflict { key, .. }) => {
                tracing::warn!(attempts = attempt, %key, "transaction retry budget exhausted");
                return Err(TransactionError::Contention { attempts: attempt }.into());
            }
            Err(err) => return Err(TransactionError::Store(err).into()),
        }
    }
}
