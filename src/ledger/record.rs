use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Document;

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementKind {
    In,
    Out,
    Adjustment,
    Transfer,
}

/// Immutable log row for one applied stock delta.
///
/// `quantity` is the number of units moved; `delta` is the signed effect on
/// the residence's stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Document)]
#[document(collection = "inventory_transactions")]
#[serde(rename_all = "camelCase")]
pub struct InventoryTransaction {
    pub id: String,
    pub item_id: String,
    pub residence_id: String,
    pub quantity: i64,
    pub delta: i64,
    pub kind: MovementKind,
    pub timestamp: DateTime<Utc>,
    /// Id of the workflow document that caused this movement.
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
