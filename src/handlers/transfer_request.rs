//! Handler: transfer.request
//!
//! Requests a transfer between residences. Responds with `{ id, short }`.

use serde_json::Value;

use crate::microsvc::{Context, HandlerError};
use crate::store::DocumentStore;
use crate::workflow::InventoryService;

pub const COMMAND: &str = "transfer.request";

pub fn guard<R>(ctx: &Context<R>) -> bool {
    ctx.has_text("fromResidenceId") && ctx.has_text("toResidenceId") && ctx.has_items("items")
}

pub fn handle<S: DocumentStore>(ctx: &Context<InventoryService<S>>) -> Result<Value, HandlerError> {
    let actor = ctx.actor()?;
    let created = ctx.inventory().request_transfer(&actor, ctx.input()?)?;
    Ok(serde_json::to_value(created)?)
}
