//! Stock ledger.
//!
//! Items keep a per-residence quantity map plus a derived total. Every change
//! goes through [`post`] inside a [`Transaction`](crate::transaction::Transaction):
//! the item is re-read, the delta applied, the total recomputed, and an
//! append-only [`InventoryTransaction`] row written with the same delta.
//!
//! Summing the `delta` of every log row for an item and residence gives the
//! stored quantity, provided the item started from zero.

mod error;
mod item;
mod maintenance;
mod movement;
mod mutator;
mod record;
mod residence;

pub use error::LedgerError;
pub use item::Item;
pub use maintenance::{
    recompute_totals, repair_negative_stock, RecomputeReport, RepairReport, REPAIR_REFERENCE,
};
pub use movement::{combine, Movement};
pub use mutator::{apply, available, load_item, post, validate};
pub use record::{InventoryTransaction, MovementKind};
pub use residence::Residence;
