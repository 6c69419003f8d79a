//! Handler: transfer.reject
//!
//! Rejects a pending transfer. No stock moves.

use serde::Deserialize;
use serde_json::Value;

use crate::microsvc::{Context, HandlerError};
use crate::store::DocumentStore;
use crate::workflow::InventoryService;

pub const COMMAND: &str = "transfer.reject";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    pub id: String,
    pub reason: String,
}

pub fn guard<R>(ctx: &Context<R>) -> bool {
    ctx.has_text("id") && ctx.has_text("reason")
}

pub fn handle<S: DocumentStore>(ctx: &Context<InventoryService<S>>) -> Result<Value, HandlerError> {
    let actor = ctx.actor()?;
    let input = ctx.input::<Input>()?;
    let updated = ctx.inventory().reject_transfer(&actor, &input.id, &input.reason)?;
    Ok(serde_json::to_value(updated)?)
}
