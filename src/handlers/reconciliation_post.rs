//! Handler: reconciliation.post
//!
//! Posts stock corrections for one residence. Responds with `{ id, short }`.

use serde_json::Value;

use crate::microsvc::{Context, HandlerError};
use crate::store::DocumentStore;
use crate::workflow::InventoryService;

pub const COMMAND: &str = "reconciliation.post";

pub fn guard<R>(ctx: &Context<R>) -> bool {
    ctx.has_text("residenceId") && ctx.has_text("reason") && ctx.has_items("adjustments")
}

pub fn handle<S: DocumentStore>(ctx: &Context<InventoryService<S>>) -> Result<Value, HandlerError> {
    let actor = ctx.actor()?;
    let created = ctx.inventory().post_reconciliation(&actor, ctx.input()?)?;
    Ok(serde_json::to_value(created)?)
}
