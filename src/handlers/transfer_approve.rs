//! Handler: transfer.approve
//!
//! Approves a pending transfer for the destination residence and moves the stock.

use serde::Deserialize;
use serde_json::Value;

use crate::microsvc::{Context, HandlerError};
use crate::store::DocumentStore;
use crate::workflow::InventoryService;

pub const COMMAND: &str = "transfer.approve";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    pub id: String,
}

pub fn guard<R>(ctx: &Context<R>) -> bool {
    ctx.has_text("id")
}

pub fn handle<S: DocumentStore>(ctx: &Context<InventoryService<S>>) -> Result<Value, HandlerError> {
    let actor = ctx.actor()?;
    let input = ctx.input::<Input>()?;
    let updated = ctx.inventory().approve_transfer(&actor, &input.id)?;
    Ok(serde_json::to_value(updated)?)
}
