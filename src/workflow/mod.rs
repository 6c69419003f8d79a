//! Movement workflows.
//!
//! Each workflow is a small state machine over one document type:
//!
//! | Workflow         | Collection        | Prefix | States                                 |
//! |------------------|-------------------|--------|----------------------------------------|
//! | Receipt (MRV)    | `mrvs`            | MRV    | Pending → Completed / Rejected         |
//! | Issue (MIV)      | `mivs`            | MIV    | Completed                              |
//! | Transfer         | `transfers`       | TRF    | Pending → Completed / Rejected         |
//! | Reconciliation   | `reconciliations` | REC    | posted                                 |
//! | Service order    | `service_orders`  | SRV    | Sent → PartiallyReturned → Completed   |
//!
//! Every action on [`InventoryService`] runs in a single optimistic
//! transaction. A workflow that fails validation writes nothing, including
//! its reserved id.

mod actor;
mod catalog;
mod common;
mod error;
mod miv;
mod mrv;
mod reconciliation;
mod service;
mod service_order;
mod transfer;

pub use actor::{Actor, Role};
pub use catalog::{ItemInput, ResidenceInput};
pub use common::{Audit, Created, LineItem, RequestStatus, MAX_LINE_QUANTITY};
pub use error::WorkflowError;
pub use miv::{Location, Miv, MivInput};
pub use mrv::{Mrv, MrvInput, MrvMeta};
pub use reconciliation::{Adjustment, AdjustmentInput, Reconciliation, ReconciliationInput};
pub use service::InventoryService;
pub use service_order::{
    ReturnLine, ServiceLine, ServiceOrder, ServiceOrderInput, ServiceOrderStatus,
};
pub use transfer::{Transfer, TransferInput};
