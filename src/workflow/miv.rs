//! Material Issue Vouchers.

use serde::{Deserialize, Serialize};

use crate::counter::DocumentKind;
use crate::ledger::{self, Movement, MovementKind};
use crate::store::DocumentStore;
use crate::Document;

use super::common::{require_residence, validate_lines};
use super::service::reserve_id;
use super::{Actor, Audit, Created, InventoryService, LineItem, RequestStatus, WorkflowError};

/// Where inside a residence the goods were issued to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
}

impl Location {
    /// `building/floor/room` with blank parts skipped; `None` when all are blank.
    pub fn label(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.building, &self.floor, &self.room]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("/"))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Document)]
#[document(collection = "mivs")]
#[serde(rename_all = "camelCase")]
pub struct Miv {
    pub id: String,
    pub short: String,
    pub residence_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub items: Vec<LineItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: RequestStatus,
    #[serde(flatten)]
    pub audit: Audit,
}

/// Input for `miv.issue`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MivInput {
    pub residence_id: String,
    #[serde(default)]
    pub location: Option<Location>,
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl<S: DocumentStore> InventoryService<S> {
    /// Issue stock out of a residence. Fails without writing when any line
    /// exceeds what the residence holds.
    pub fn issue_miv(&self, actor: &Actor, input: MivInput) -> Result<Created, WorkflowError> {
        validate_lines(&input.items)?;
        actor.require_access(&input.residence_id)?;
        let now = self.now();
        let location_id = input.location.as_ref().and_then(Location::label);

        let created = self.transact(|tx| {
            require_residence(tx, &input.residence_id)?;
            let id = reserve_id(tx, DocumentKind::Miv, &now)?;
            let reference = id.canonical();

            let movements = input.items.iter().map(|line| {
                Movement::new(
                    line.item_id.clone(),
                    input.residence_id.clone(),
                    -line.quantity,
                    MovementKind::Out,
                    reference.clone(),
                )
                .with_location(location_id.clone())
                .with_notes(input.notes.clone())
            });
            ledger::post(tx, movements, now)?;

            tx.create(&Miv {
                id: reference.clone(),
                short: id.short(),
                residence_id: input.residence_id.clone(),
                location: input.location.clone(),
                items: input.items.clone(),
                notes: input.notes.clone(),
                status: RequestStatus::Completed,
                audit: Audit::completed(&actor.user_id, now),
            })?;
            Ok(Created::from(&id))
        })?;

        tracing::info!(id = %created.id, residence = %input.residence_id, "miv issued");
        Ok(created)
    }
}
