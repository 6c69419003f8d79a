//! Optimistic transactions over a [`DocumentStore`](crate::DocumentStore).
//!
//! A [`Transaction`] records the version of every key it reads and buffers
//! every write. Committing turns the read set into batch preconditions, so a
//! transaction whose reads went stale is rejected as a whole. [`run`] retries
//! the closure from scratch on such conflicts until the attempt budget is
//! spent.
//!
//! ## Example
//!
//! ```ignore
//! let next = transaction::run(&store, &TransactionOptions::default(), |tx| {
//!     let mut counter = tx.get::<Counter>("mrv-25-08")?.unwrap_or_default();
//!     counter.seq += 1;
//!     tx.set(&counter)?;
//!     Ok::<_, TransactionError>(counter.seq)
//! })?;
//! ```

mod error;
mod runner;
#[allow(clippy::module_inception)]
mod transaction;

pub use error::TransactionError;
pub use runner::{run, TransactionOptions};
pub use transaction::Transaction;
