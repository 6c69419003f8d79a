//! Audit-driven stock reconciliation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::counter::DocumentKind;
use crate::ledger::{self, Movement, MovementKind};
use crate::store::DocumentStore;
use crate::Document;

use super::common::{
    require_distinct_items, require_residence, require_text, require_within_limit,
};
use super::service::reserve_id;
use super::{Actor, Created, InventoryService, WorkflowError};

/// One requested correction: either a signed delta or a physical count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentInput {
    #[serde(alias = "id")]
    pub item_id: String,
    #[serde(default)]
    pub delta: Option<i64>,
    /// Counted quantity; the delta becomes `counted - current`.
    #[serde(default)]
    pub counted_quantity: Option<i64>,
    #[serde(default)]
    pub location_id: Option<String>,
}

/// An adjustment as it was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Adjustment {
    pub item_id: String,
    /// Quantity at the residence before the adjustment.
    pub previous: i64,
    pub delta: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Document)]
#[document(collection = "reconciliations")]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation {
    pub id: String,
    pub short: String,
    pub residence_id: String,
    pub reason: String,
    pub adjustments: Vec<Adjustment>,
    pub total_increase: i64,
    pub total_decrease: i64,
    pub posted_by: String,
    pub posted_at: DateTime<Utc>,
}

/// Input for `reconciliation.post`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationInput {
    pub residence_id: String,
    pub reason: String,
    pub adjustments: Vec<AdjustmentInput>,
}

fn validate_adjustments(adjustments: &[AdjustmentInput]) -> Result<(), WorkflowError> {
    if adjustments.is_empty() {
        return Err(WorkflowError::validation("at least one adjustment is required"));
    }
    for adjustment in adjustments {
        require_text("itemId", &adjustment.item_id)?;
        match (adjustment.delta, adjustment.counted_quantity) {
            (Some(delta), None) => require_within_limit("delta", &adjustment.item_id, delta)?,
            (None, Some(counted)) if counted >= 0 => {
                require_within_limit("countedQuantity", &adjustment.item_id, counted)?
            }
            (None, Some(counted)) => {
                return Err(WorkflowError::validation(format!(
                    "counted quantity for item {} cannot be negative, got {}",
                    adjustment.item_id, counted
                )))
            }
            _ => {
                return Err(WorkflowError::validation(format!(
                    "adjustment for item {} needs exactly one of delta or countedQuantity",
                    adjustment.item_id
                )))
            }
        }
    }
    require_distinct_items(adjustments.iter().map(|a| a.item_id.as_str()))
}

impl<S: DocumentStore> InventoryService<S> {
    /// Post stock corrections for one residence. Takes effect immediately.
    pub fn post_reconciliation(
        &self,
        actor: &Actor,
        input: ReconciliationInput,
    ) -> Result<Created, WorkflowError> {
        require_text("reason", &input.reason)?;
        validate_adjustments(&input.adjustments)?;
        actor.require_access(&input.residence_id)?;
        let now = self.now();

        let (created, reconciliation) = self.transact(|tx| {
            require_residence(tx, &input.residence_id)?;
            let id = reserve_id(tx, DocumentKind::Reconciliation, &now)?;
            let reference = id.canonical();

            let mut applied = Vec::with_capacity(input.adjustments.len());
            for adjustment in &input.adjustments {
                let previous = ledger::available(tx, &adjustment.item_id, &input.residence_id)?;
                let delta = match adjustment.counted_quantity {
                    Some(counted) => counted.checked_sub(previous).ok_or_else(|| {
                        WorkflowError::validation(format!(
                            "stock of item {} is out of range for a count",
                            adjustment.item_id
                        ))
                    })?,
                    None => adjustment.delta.unwrap_or(0),
                };
                applied.push(Adjustment {
                    item_id: adjustment.item_id.clone(),
                    previous,
                    delta,
                    location_id: adjustment.location_id.clone(),
                });
            }

            let movements = applied.iter().map(|adjustment| {
                Movement::new(
                    adjustment.item_id.clone(),
                    input.residence_id.clone(),
                    adjustment.delta,
                    MovementKind::Adjustment,
                    reference.clone(),
                )
                .with_location(adjustment.location_id.clone())
                .with_notes(Some(input.reason.clone()))
            });
            ledger::post(tx, movements, now)?;

            let total_increase = applied
                .iter()
                .try_fold(0_i64, |sum, a| sum.checked_add(a.delta.max(0)));
            let total_decrease = applied
                .iter()
                .try_fold(0_i64, |sum, a| sum.checked_add(a.delta.min(0).saturating_neg()));
            let (Some(total_increase), Some(total_decrease)) = (total_increase, total_decrease)
            else {
                return Err(WorkflowError::validation("adjustment totals are out of range"));
            };
            let reconciliation = Reconciliation {
                id: reference.clone(),
                short: id.short(),
                residence_id: input.residence_id.clone(),
                reason: input.reason.clone(),
                adjustments: applied,
                total_increase,
                total_decrease,
                posted_by: actor.user_id.clone(),
                posted_at: now,
            };
            tx.create(&reconciliation)?;
            Ok((Created::from(&id), reconciliation))
        })?;

        tracing::info!(
            id = %created.id,
            residence = %input.residence_id,
            increase = reconciliation.total_increase,
            decrease = reconciliation.total_decrease,
            "reconciliation posted"
        );
        Ok(created)
    }
}
