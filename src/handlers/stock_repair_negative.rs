//! Handler: stock.repair-negative
//!
//! Clamps negative stock to zero with compensating log rows (admin only).

use serde_json::Value;

use crate::microsvc::{Context, HandlerError};
use crate::store::DocumentStore;
use crate::workflow::InventoryService;

pub const COMMAND: &str = "stock.repair-negative";

pub fn guard<R>(_ctx: &Context<R>) -> bool {
    true
}

pub fn handle<S: DocumentStore>(ctx: &Context<InventoryService<S>>) -> Result<Value, HandlerError> {
    let actor = ctx.actor()?;
    let report = ctx.inventory().repair_negative_stock(&actor)?;
    Ok(serde_json::to_value(report)?)
}
