//! Material Receipt Vouchers.

use serde::{Deserialize, Serialize};

use crate::counter::DocumentKind;
use crate::ledger::{self, Movement, MovementKind};
use crate::notify::Notification;
use crate::store::DocumentStore;
use crate::Document;

use super::common::{ensure_pending, require_residence, require_text, validate_lines};
use super::service::reserve_id;
use super::{Actor, Audit, Created, InventoryService, LineItem, RequestStatus, WorkflowError};

/// Supplier details attached to a receipt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MrvMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Document)]
#[document(collection = "mrvs")]
#[serde(rename_all = "camelCase")]
pub struct Mrv {
    pub id: String,
    pub short: String,
    pub residence_id: String,
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub meta: MrvMeta,
    pub status: RequestStatus,
    #[serde(flatten)]
    pub audit: Audit,
}

/// Input for `mrv.receive` and `mrv.request`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MrvInput {
    pub residence_id: String,
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub meta: MrvMeta,
}

fn receipts(mrv: &Mrv) -> Vec<Movement> {
    mrv.items
        .iter()
        .map(|line| {
            Movement::new(
                line.item_id.clone(),
                mrv.residence_id.clone(),
                line.quantity,
                MovementKind::In,
                mrv.id.clone(),
            )
            .with_notes(mrv.meta.notes.clone())
        })
        .collect()
}

impl<S: DocumentStore> InventoryService<S> {
    /// Record received goods immediately.
    pub fn receive_mrv(&self, actor: &Actor, input: MrvInput) -> Result<Created, WorkflowError> {
        validate_lines(&input.items)?;
        actor.require_access(&input.residence_id)?;
        let now = self.now();

        let created = self.transact(|tx| {
            require_residence(tx, &input.residence_id)?;
            let id = reserve_id(tx, DocumentKind::Mrv, &now)?;
            let mrv = Mrv {
                id: id.canonical(),
                short: id.short(),
                residence_id: input.residence_id.clone(),
                items: input.items.clone(),
                meta: input.meta.clone(),
                status: RequestStatus::Completed,
                audit: Audit::completed(&actor.user_id, now),
            };
            ledger::post(tx, receipts(&mrv), now)?;
            tx.create(&mrv)?;
            Ok(Created::from(&id))
        })?;

        tracing::info!(id = %created.id, residence = %input.residence_id, "mrv received");
        Ok(created)
    }

    /// File a receipt that waits for approval before touching stock.
    pub fn request_mrv(&self, actor: &Actor, input: MrvInput) -> Result<Created, WorkflowError> {
        validate_lines(&input.items)?;
        actor.require_access(&input.residence_id)?;
        let now = self.now();

        let created = self.transact(|tx| {
            require_residence(tx, &input.residence_id)?;
            for line in &input.items {
                ledger::load_item(tx, &line.item_id)?;
            }
            let id = reserve_id(tx, DocumentKind::Mrv, &now)?;
            tx.create(&Mrv {
                id: id.canonical(),
                short: id.short(),
                residence_id: input.residence_id.clone(),
                items: input.items.clone(),
                meta: input.meta.clone(),
                status: RequestStatus::Pending,
                audit: Audit::requested(&actor.user_id, now),
            })?;
            Ok(Created::from(&id))
        })?;

        tracing::info!(id = %created.id, residence = %input.residence_id, "mrv requested");
        self.notify(
            Notification::new(
                "mrv.requested",
                &created.id,
                &actor.user_id,
                format!("receipt {} awaits approval", created.short),
                now,
            )
            .for_residence(&input.residence_id),
        );
        Ok(created)
    }

    /// Approve a pending receipt; stock is received in the same commit.
    pub fn approve_mrv(&self, actor: &Actor, id: &str) -> Result<Mrv, WorkflowError> {
        let now = self.now();
        let mrv = self.transact(|tx| {
            let mut mrv: Mrv = tx.require(id)?;
            actor.require_approver(&mrv.residence_id)?;
            ensure_pending(&mrv.id, mrv.status, "approve")?;

            ledger::post(tx, receipts(&mrv), now)?;
            mrv.status = RequestStatus::Completed;
            mrv.audit.approve(&actor.user_id, now);
            tx.set(&mrv)?;
            Ok(mrv)
        })?;

        tracing::info!(id = %mrv.id, approved_by = %actor.user_id, "mrv approved");
        Ok(mrv)
    }

    pub fn reject_mrv(&self, actor: &Actor, id: &str, reason: &str) -> Result<Mrv, WorkflowError> {
        require_text("reason", reason)?;
        let now = self.now();
        let mrv = self.transact(|tx| {
            let mut mrv: Mrv = tx.require(id)?;
            actor.require_approver(&mrv.residence_id)?;
            ensure_pending(&mrv.id, mrv.status, "reject")?;

            mrv.status = RequestStatus::Rejected;
            mrv.audit.reject(&actor.user_id, now, reason);
            tx.set(&mrv)?;
            Ok(mrv)
        })?;

        tracing::info!(id = %mrv.id, rejected_by = %actor.user_id, "mrv rejected");
        Ok(mrv)
    }
}
