//! Handler: item.create
//!
//! Registers an item with zero stock (admin only). Responds with the item.

use serde_json::Value;

use crate::microsvc::{Context, HandlerError};
use crate::store::DocumentStore;
use crate::workflow::InventoryService;

pub const COMMAND: &str = "item.create";

pub fn guard<R>(ctx: &Context<R>) -> bool {
    ctx.has_text("nameEn") && ctx.has_text("category") && ctx.has_text("unit")
}

pub fn handle<S: DocumentStore>(ctx: &Context<InventoryService<S>>) -> Result<Value, HandlerError> {
    let actor = ctx.actor()?;
    let created = ctx.inventory().create_item(&actor, ctx.input()?)?;
    Ok(serde_json::to_value(created)?)
}
