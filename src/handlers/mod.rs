//! Command handlers for the inventory service.
//!
//! One module per command, each exporting `COMMAND`, `guard` and `handle`.
//! [`inventory_service`] registers all of them.

use crate::microsvc::Service;
use crate::store::DocumentStore;
use crate::workflow::InventoryService;

pub mod item_create;
pub mod miv_issue;
pub mod mrv_approve;
pub mod mrv_receive;
pub mod mrv_reject;
pub mod mrv_request;
pub mod reconciliation_post;
pub mod residence_create;
pub mod service_order_close;
pub mod service_order_create;
pub mod service_order_return;
pub mod stock_recompute_totals;
pub mod stock_repair_negative;
pub mod transfer_approve;
pub mod transfer_reject;
pub mod transfer_request;

/// Build a command service exposing every inventory command.
pub fn inventory_service<S>(inventory: InventoryService<S>) -> Service<InventoryService<S>>
where
    S: DocumentStore + 'static,
{
    crate::register_handlers!(
        Service::new(inventory).require_identity(),
        mrv_receive,
        mrv_request,
        mrv_approve,
        mrv_reject,
        miv_issue,
        transfer_request,
        transfer_approve,
        transfer_reject,
        reconciliation_post,
        service_order_create,
        service_order_return,
        service_order_close,
        stock_repair_negative,
        stock_recompute_totals,
        item_create,
        residence_create,
    )
}
