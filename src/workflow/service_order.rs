//! Items sent out to a vendor for service, and their return or scrap.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::counter::DocumentKind;
use crate::ledger::{self, Movement, MovementKind};
use crate::store::DocumentStore;
use crate::Document;

use super::common::{
    require_distinct_items, require_residence, require_text, require_within_limit, validate_lines,
};
use super::service::reserve_id;
use super::{Actor, Created, InventoryService, LineItem, WorkflowError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ServiceOrderStatus {
    Sent,
    PartiallyReturned,
    Completed,
}

impl ServiceOrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceOrderStatus::Sent => "sent",
            ServiceOrderStatus::PartiallyReturned => "partiallyReturned",
            ServiceOrderStatus::Completed => "completed",
        }
    }
}

/// A line on a service order with its disposition so far.
///
/// `returned + scrapped + outstanding == quantity` until the order is closed;
/// closing moves whatever is outstanding into `written_off`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLine {
    pub item_id: String,
    pub quantity: i64,
    #[serde(default)]
    pub returned: i64,
    #[serde(default)]
    pub scrapped: i64,
    #[serde(default)]
    pub written_off: i64,
    pub outstanding: i64,
}

impl ServiceLine {
    fn sent(line: &LineItem) -> Self {
        Self {
            item_id: line.item_id.clone(),
            quantity: line.quantity,
            returned: 0,
            scrapped: 0,
            written_off: 0,
            outstanding: line.quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Document)]
#[document(collection = "service_orders")]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrder {
    pub id: String,
    pub short: String,
    pub residence_id: String,
    pub vendor: String,
    pub items: Vec<ServiceLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: ServiceOrderStatus,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
}

impl ServiceOrder {
    pub fn outstanding(&self) -> i64 {
        self.items.iter().map(|line| line.outstanding).sum()
    }

    fn ensure_open(&self, action: &'static str) -> Result<(), WorkflowError> {
        if self.status == ServiceOrderStatus::Completed {
            return Err(WorkflowError::InvalidState {
                id: self.id.clone(),
                status: self.status.as_str().to_string(),
                action,
            });
        }
        Ok(())
    }
}

/// Input for `service-order.create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrderInput {
    pub residence_id: String,
    pub vendor: String,
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Disposition of one line in a `service-order.return` posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnLine {
    #[serde(alias = "id")]
    pub item_id: String,
    #[serde(default)]
    pub returned: i64,
    #[serde(default)]
    pub scrapped: i64,
}

impl<S: DocumentStore> InventoryService<S> {
    /// Send items out for service; stock leaves the residence now.
    pub fn create_service_order(
        &self,
        actor: &Actor,
        input: ServiceOrderInput,
    ) -> Result<Created, WorkflowError> {
        validate_lines(&input.items)?;
        require_distinct_items(input.items.iter().map(|line| line.item_id.as_str()))?;
        require_text("vendor", &input.vendor)?;
        actor.require_access(&input.residence_id)?;
        let now = self.now();

        let created = self.transact(|tx| {
            require_residence(tx, &input.residence_id)?;
            let id = reserve_id(tx, DocumentKind::ServiceOrder, &now)?;
            let reference = id.canonical();

            let movements = input.items.iter().map(|line| {
                Movement::new(
                    line.item_id.clone(),
                    input.residence_id.clone(),
                    -line.quantity,
                    MovementKind::Out,
                    reference.clone(),
                )
                .with_notes(Some(format!("sent for service to {}", input.vendor)))
            });
            ledger::post(tx, movements, now)?;

            tx.create(&ServiceOrder {
                id: reference.clone(),
                short: id.short(),
                residence_id: input.residence_id.clone(),
                vendor: input.vendor.clone(),
                items: input.items.iter().map(ServiceLine::sent).collect(),
                notes: input.notes.clone(),
                status: ServiceOrderStatus::Sent,
                created_by: actor.user_id.clone(),
                created_at: now,
                updated_at: now,
                closed_by: None,
                closed_at: None,
            })?;
            Ok(Created::from(&id))
        })?;

        tracing::info!(id = %created.id, vendor = %input.vendor, "service order created");
        Ok(created)
    }

    /// Post returned and scrapped quantities. Returned units go back into
    /// stock; scrapped units only reduce what is outstanding.
    pub fn return_service_order(
        &self,
        actor: &Actor,
        id: &str,
        lines: &[ReturnLine],
    ) -> Result<ServiceOrder, WorkflowError> {
        if lines.is_empty() {
            return Err(WorkflowError::validation("at least one return line is required"));
        }
        require_distinct_items(lines.iter().map(|line| line.item_id.as_str()))?;
        let now = self.now();

        let order = self.transact(|tx| {
            let mut order: ServiceOrder = tx.require(id)?;
            actor.require_access(&order.residence_id)?;
            order.ensure_open("return")?;

            let mut movements = Vec::new();
            for posted in lines {
                if posted.returned < 0 || posted.scrapped < 0 {
                    return Err(WorkflowError::validation(format!(
                        "returned and scrapped for item {} cannot be negative",
                        posted.item_id
                    )));
                }
                require_within_limit("returned", &posted.item_id, posted.returned)?;
                require_within_limit("scrapped", &posted.item_id, posted.scrapped)?;
                let settled = posted.returned + posted.scrapped;
                if settled == 0 {
                    return Err(WorkflowError::validation(format!(
                        "nothing returned or scrapped for item {}",
                        posted.item_id
                    )));
                }

                let line = order
                    .items
                    .iter_mut()
                    .find(|line| line.item_id == posted.item_id)
                    .ok_or_else(|| {
                        WorkflowError::validation(format!(
                            "item {} is not on service order {}",
                            posted.item_id, id
                        ))
                    })?;
                if settled > line.outstanding {
                    return Err(WorkflowError::validation(format!(
                        "item {}: {} settled but only {} outstanding",
                        line.item_id, settled, line.outstanding
                    )));
                }

                line.returned += posted.returned;
                line.scrapped += posted.scrapped;
                line.outstanding -= settled;
                if posted.returned > 0 {
                    movements.push(Movement::new(
                        line.item_id.clone(),
                        order.residence_id.clone(),
                        posted.returned,
                        MovementKind::In,
                        order.id.clone(),
                    ));
                }
            }
            ledger::post(tx, movements, now)?;

            order.status = if order.outstanding() == 0 {
                ServiceOrderStatus::Completed
            } else {
                ServiceOrderStatus::PartiallyReturned
            };
            order.updated_at = now;
            tx.set(&order)?;
            Ok(order)
        })?;

        tracing::info!(
            id = %order.id,
            status = order.status.as_str(),
            outstanding = order.outstanding(),
            "service order return posted"
        );
        Ok(order)
    }

    /// Close an order early, writing off whatever is still outstanding.
    pub fn close_service_order(
        &self,
        actor: &Actor,
        id: &str,
        notes: Option<String>,
    ) -> Result<ServiceOrder, WorkflowError> {
        let now = self.now();
        let order = self.transact(|tx| {
            let mut order: ServiceOrder = tx.require(id)?;
            actor.require_access(&order.residence_id)?;
            order.ensure_open("close")?;

            for line in &mut order.items {
                line.written_off += line.outstanding;
                line.outstanding = 0;
            }
            if notes.is_some() {
                order.notes = notes.clone();
            }
            order.status = ServiceOrderStatus::Completed;
            order.updated_at = now;
            order.closed_by = Some(actor.user_id.clone());
            order.closed_at = Some(now);
            tx.set(&order)?;
            Ok(order)
        })?;

        tracing::info!(id = %order.id, closed_by = %actor.user_id, "service order closed");
        Ok(order)
    }
}
