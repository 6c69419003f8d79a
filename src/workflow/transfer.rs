//! Stock transfers between residences.

use serde::{Deserialize, Serialize};

use crate::counter::DocumentKind;
use crate::ledger::{self, Movement, MovementKind};
use crate::notify::Notification;
use crate::store::DocumentStore;
use crate::Document;

use super::common::{ensure_pending, require_residence, require_text, validate_lines};
use super::service::reserve_id;
use super::{Actor, Audit, Created, InventoryService, LineItem, RequestStatus, WorkflowError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Document)]
#[document(collection = "transfers")]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    pub id: String,
    pub short: String,
    pub from_residence_id: String,
    pub to_residence_id: String,
    pub items: Vec<LineItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: RequestStatus,
    #[serde(flatten)]
    pub audit: Audit,
}

/// Input for `transfer.request`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferInput {
    pub from_residence_id: String,
    pub to_residence_id: String,
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Outbound leg at the source for every line.
fn outbound(transfer: &Transfer) -> impl Iterator<Item = Movement> + '_ {
    transfer.items.iter().map(move |line| {
        Movement::new(
            line.item_id.clone(),
            transfer.from_residence_id.clone(),
            -line.quantity,
            MovementKind::Transfer,
            transfer.id.clone(),
        )
    })
}

/// Inbound leg at the destination for every line.
fn inbound(transfer: &Transfer) -> impl Iterator<Item = Movement> + '_ {
    transfer.items.iter().map(move |line| {
        Movement::new(
            line.item_id.clone(),
            transfer.to_residence_id.clone(),
            line.quantity,
            MovementKind::Transfer,
            transfer.id.clone(),
        )
    })
}

impl<S: DocumentStore> InventoryService<S> {
    /// Ask to move stock to another residence. Availability at the source is
    /// checked now and again on approval.
    pub fn request_transfer(
        &self,
        actor: &Actor,
        input: TransferInput,
    ) -> Result<Created, WorkflowError> {
        validate_lines(&input.items)?;
        require_text("fromResidenceId", &input.from_residence_id)?;
        require_text("toResidenceId", &input.to_residence_id)?;
        if input.from_residence_id == input.to_residence_id {
            return Err(WorkflowError::validation(
                "source and destination residence must differ",
            ));
        }
        actor.require_access(&input.from_residence_id)?;
        let now = self.now();

        let created = self.transact(|tx| {
            require_residence(tx, &input.from_residence_id)?;
            require_residence(tx, &input.to_residence_id)?;

            let id = reserve_id(tx, DocumentKind::Transfer, &now)?;
            let transfer = Transfer {
                id: id.canonical(),
                short: id.short(),
                from_residence_id: input.from_residence_id.clone(),
                to_residence_id: input.to_residence_id.clone(),
                items: input.items.clone(),
                notes: input.notes.clone(),
                status: RequestStatus::Pending,
                audit: Audit::requested(&actor.user_id, now),
            };
            let outgoing: Vec<Movement> = outbound(&transfer).collect();
            ledger::validate(tx, &outgoing)?;

            tx.create(&transfer)?;
            Ok(Created::from(&id))
        })?;

        tracing::info!(
            id = %created.id,
            from = %input.from_residence_id,
            to = %input.to_residence_id,
            "transfer requested"
        );
        self.notify(
            Notification::new(
                "transfer.requested",
                &created.id,
                &actor.user_id,
                format!(
                    "transfer {} from {} awaits approval",
                    created.short, input.from_residence_id
                ),
                now,
            )
            .for_residence(&input.to_residence_id),
        );
        Ok(created)
    }

    /// Approve a pending transfer on behalf of the destination residence and
    /// move the stock.
    pub fn approve_transfer(&self, actor: &Actor, id: &str) -> Result<Transfer, WorkflowError> {
        let now = self.now();
        let transfer = self.transact(|tx| {
            let mut transfer: Transfer = tx.require(id)?;
            actor.require_access(&transfer.to_residence_id)?;
            ensure_pending(&transfer.id, transfer.status, "approve")?;

            let movements: Vec<Movement> =
                outbound(&transfer).chain(inbound(&transfer)).collect();
            ledger::post(tx, movements, now)?;

            transfer.status = RequestStatus::Completed;
            transfer.audit.approve(&actor.user_id, now);
            tx.set(&transfer)?;
            Ok(transfer)
        })?;

        tracing::info!(id = %transfer.id, approved_by = %actor.user_id, "transfer approved");
        Ok(transfer)
    }

    pub fn reject_transfer(
        &self,
        actor: &Actor,
        id: &str,
        reason: &str,
    ) -> Result<Transfer, WorkflowError> {
        require_text("reason", reason)?;
        let now = self.now();
        let transfer = self.transact(|tx| {
            let mut transfer: Transfer = tx.require(id)?;
            actor.require_access(&transfer.to_residence_id)?;
            ensure_pending(&transfer.id, transfer.status, "reject")?;

            transfer.status = RequestStatus::Rejected;
            transfer.audit.reject(&actor.user_id, now, reason);
            tx.set(&transfer)?;
            Ok(transfer)
        })?;

        tracing::info!(id = %transfer.id, rejected_by = %actor.user_id, "transfer rejected");
        Ok(transfer)
    }
}
