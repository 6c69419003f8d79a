//! Handler: mrv.reject
//!
//! Rejects a pending receipt. No stock moves.

use serde::Deserialize;
use serde_json::Value;

use crate::microsvc::{Context, HandlerError};
use crate::store::DocumentStore;
use crate::workflow::InventoryService;

pub const COMMAND: &str = "mrv.reject";

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
    let updated = ctx.inventory().reject_mrv(&actor, &input.id, &input.reason)?;
    Ok(serde_json::to_value(updated)?)
}
