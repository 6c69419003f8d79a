//! Handler: mrv.receive
//!
//! Records received goods immediately. Responds with `{ id, short }`.

use serde_json::Value;

use crate::microsvc::{Context, HandlerError};
use crate::store::DocumentStore;
use crate::workflow::InventoryService;

pub const COMMAND: &str = "mrv.receive";

pub fn guard<R>(ctx: &Context<R>) -> bool {
    ctx.has_text("residenceId") && ctx.has_items("items")
}

pub fn handle<S: DocumentStore>(ctx: &Context<InventoryService<S>>) -> Result<Value, HandlerError> {
    let actor = ctx.actor()?;
    let created = ctx.inventory().receive_mrv(&actor, ctx.input()?)?;
    Ok(serde_json::to_value(created)?)
}
