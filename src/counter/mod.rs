//! Counter allocator - monthly sequential identifiers for workflow documents.
//!
//! Each `(kind, year, month)` owns one counter document. Reserving reads it,
//! writes `seq + 1`, and hands back a [`DocumentId`] that renders both the
//! canonical (`MRV-25-08-001`) and short (`MRV-25081`) forms of the same
//! allocation. Sequences are unique and increasing; gaps are allowed.

mod allocator;
mod document_id;

pub use allocator::{reserve, Counter};
pub use document_id::{DocumentId, DocumentIdError, DocumentKind, Period};
