//! Handler: service-order.return
//!
//! Posts returned and scrapped quantities against a service order.

use serde::Deserialize;
use serde_json::Value;

use crate::microsvc::{Context, HandlerError};
use crate::store::DocumentStore;
use crate::workflow::{InventoryService, ReturnLine};

pub const COMMAND: &str = "service-order.return";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    pub id: String,
    pub items: Vec<ReturnLine>,
}

pub fn guard<R>(ctx: &Context<R>) -> bool {
    ctx.has_text("id") && ctx.has_items("items")
}

pub fn handle<S: DocumentStore>(ctx: &Context<InventoryService<S>>) -> Result<Value, HandlerError> {
    let actor = ctx.actor()?;
    let input = ctx.input::<Input>()?;
    let updated = ctx.inventory().return_service_order(&actor, &input.id, &input.items)?;
    Ok(serde_json::to_value(updated)?)
}
