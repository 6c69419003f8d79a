//! Handler: residence.create
//!
//! Registers a residence (admin only). Responds with the residence.

use serde_json::Value;

use crate::microsvc::{Context, HandlerError};
use crate::store::DocumentStore;
use crate::workflow::InventoryService;

pub const COMMAND: &str = "residence.create";

pub fn guard<R>(ctx: &Context<R>) -> bool {
    ctx.has_text("id") && ctx.has_text("name")
}

pub fn handle<S: DocumentStore>(ctx: &Context<InventoryService<S>>) -> Result<Value, HandlerError> {
    let actor = ctx.actor()?;
    let created = ctx.inventory().create_residence(&actor, ctx.input()?)?;
    Ok(serde_json::to_value(created)?)
}
