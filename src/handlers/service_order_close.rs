//! Handler: service-order.close
//!
//! Closes a service order, writing off what is still outstanding.

use serde::Deserialize;
use serde_json::Value;

use crate::microsvc::{Context, HandlerError};
use crate::store::DocumentStore;
use crate::workflow::InventoryService;

pub const COMMAND: &str = "service-order.close";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    pub id: String,
    #[serde(default)]
    pub notes: Option<String>,
}

pub fn guard<R>(ctx: &Context<R>) -> bool {
    ctx.has_text("id")
}

pub fn handle<S: DocumentStore>(ctx: &Context<InventoryService<S>>) -> Result<Value, HandlerError> {
    let actor = ctx.actor()?;
    let input = ctx.input::<Input>()?;
    let updated = ctx.inventory().close_service_order(&actor, &input.id, input.notes)?;
    Ok(serde_json::to_value(updated)?)
}
