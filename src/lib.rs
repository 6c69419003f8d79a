//! EstateCare inventory core.
//!
//! Sequential voucher ids, a per-residence stock ledger, and the movement
//! workflows (receipts, issues, transfers, reconciliations, service orders)
//! that combine them. Every workflow action runs as one optimistic
//! transaction over a versioned document store, so id reservation, stock
//! changes, log rows and the workflow document land together or not at all.
//!
//! ```ignore
//! use estatecare::{Actor, InMemoryDocumentStore, InventoryService, MivInput};
//!
//! let inventory = InventoryService::new(InMemoryDocumentStore::new());
//! let created = inventory.issue_miv(&actor, input)?;
//! println!("{} ({})", created.id, created.short);
//! ```

extern crate self as estatecare;

pub mod clock;
pub mod config;
pub mod counter;
pub mod handlers;
pub mod ledger;
pub mod microsvc;
pub mod notify;
pub mod rate_limit;
pub mod store;
pub mod telemetry;
pub mod transaction;
pub mod workflow;

pub use clock::{Clock, FixedClock, SystemClock};
pub use counter::{DocumentId, DocumentKind, Period};
pub use ledger::{InventoryTransaction, Item, LedgerError, Movement, MovementKind, Residence};
pub use store::{
    Collection, Document, DocumentStore, DocumentsExt, InMemoryDocumentStore, StoreError,
    Versioned,
};
pub use transaction::{Transaction, TransactionError, TransactionOptions};
pub use workflow::{Actor, Created, InventoryService, LineItem, Role, WorkflowError};

/// Derive macro implementing [`Document`] for a struct.
pub use estatecare_macros::Document;
