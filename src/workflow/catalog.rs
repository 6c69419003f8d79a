//! Item and residence registration plus the admin maintenance commands.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ledger::{self, Item, RecomputeReport, RepairReport, Residence};
use crate::notify::Notification;
use crate::store::DocumentStore;

use super::common::require_text;
use super::{Actor, InventoryService, WorkflowError};

/// Input for `item.create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemInput {
    /// Generated when omitted.
    #[serde(default)]
    pub id: Option<String>,
    pub name_en: String,
    #[serde(default)]
    pub name_ar: String,
    pub category: String,
    pub unit: String,
    #[serde(default)]
    pub lifespan_days: Option<u32>,
}

/// Input for `residence.create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidenceInput {
    pub id: String,
    pub name: String,
}

impl<S: DocumentStore> InventoryService<S> {
    /// Register a new item with no stock anywhere.
    pub fn create_item(&self, actor: &Actor, input: ItemInput) -> Result<Item, WorkflowError> {
        actor.require_admin()?;
        require_text("nameEn", &input.name_en)?;
        require_text("category", &input.category)?;
        require_text("unit", &input.unit)?;
        let id = match &input.id {
            Some(id) => {
                require_text("id", id)?;
                id.clone()
            }
            None => Uuid::new_v4().to_string(),
        };

        let mut item = Item::new(
            id,
            input.name_en.clone(),
            input.name_ar.clone(),
            input.category.clone(),
            input.unit.clone(),
        );
        item.lifespan_days = input.lifespan_days;

        self.transact(|tx| {
            tx.create(&item)?;
            Ok(())
        })?;
        tracing::info!(item = %item.id, "item created");
        Ok(item)
    }

    pub fn create_residence(
        &self,
        actor: &Actor,
        input: ResidenceInput,
    ) -> Result<Residence, WorkflowError> {
        actor.require_admin()?;
        require_text("id", &input.id)?;
        require_text("name", &input.name)?;

        let residence = Residence::new(input.id, input.name);
        self.transact(|tx| {
            tx.create(&residence)?;
            Ok(())
        })?;
        tracing::info!(residence = %residence.id, "residence created");
        Ok(residence)
    }

    /// Clamp negative stock to zero across every item (admin only).
    pub fn repair_negative_stock(&self, actor: &Actor) -> Result<RepairReport, WorkflowError> {
        actor.require_admin()?;
        let now = self.now();
        let report = ledger::repair_negative_stock(self.store(), self.options(), now)?;

        if report.entries_fixed > 0 {
            self.notify(Notification::new(
                "stock.repaired",
                ledger::REPAIR_REFERENCE,
                &actor.user_id,
                format!(
                    "{} negative stock entries clamped across {} items",
                    report.entries_fixed, report.items_scanned
                ),
                now,
            ));
        }
        Ok(report)
    }

    pub fn recompute_totals(&self, actor: &Actor) -> Result<RecomputeReport, WorkflowError> {
        actor.require_admin()?;
        Ok(ledger::recompute_totals(self.store(), self.options())?)
    }
}
