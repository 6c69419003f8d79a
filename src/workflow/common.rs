use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::counter::DocumentId;
use crate::ledger::Residence;
use crate::store::DocumentStore;
use crate::transaction::Transaction;

use super::WorkflowError;

/// One requested item and quantity on a workflow document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(alias = "id")]
    pub item_id: String,
    pub quantity: i64,
}

impl LineItem {
    pub fn new(item_id: impl Into<String>, quantity: i64) -> Self {
        Self {
            item_id: item_id.into(),
            quantity,
        }
    }
}

/// Status of documents that pass through an approval gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RequestStatus {
    Pending,
    Completed,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Completed => "completed",
            RequestStatus::Rejected => "rejected",
        }
    }
}

/// Who did what to a workflow document, and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Audit {
    pub requested_by: String,
    pub requested_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl Audit {
    pub fn requested(by: &str, at: DateTime<Utc>) -> Self {
        Self {
            requested_by: by.to_string(),
            requested_at: at,
            approved_by: None,
            approved_at: None,
            rejected_by: None,
            rejected_at: None,
            rejection_reason: None,
        }
    }

    /// Recorded and approved in one step by the same actor.
    pub fn completed(by: &str, at: DateTime<Utc>) -> Self {
        let mut audit = Self::requested(by, at);
        audit.approve(by, at);
        audit
    }

    pub fn approve(&mut self, by: &str, at: DateTime<Utc>) {
        self.approved_by = Some(by.to_string());
        self.approved_at = Some(at);
    }

    pub fn reject(&mut self, by: &str, at: DateTime<Utc>, reason: &str) {
        self.rejected_by = Some(by.to_string());
        self.rejected_at = Some(at);
        self.rejection_reason = Some(reason.to_string());
    }
}

/// Identifiers returned when a workflow document is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Created {
    pub id: String,
    pub short: String,
}

impl From<&DocumentId> for Created {
    fn from(id: &DocumentId) -> Self {
        Self {
            id: id.canonical(),
            short: id.short(),
        }
    }
}

/// Largest quantity a single line, return or adjustment may carry.
pub const MAX_LINE_QUANTITY: i64 = 1_000_000_000;

/// Reject a quantity above [`MAX_LINE_QUANTITY`].
pub(crate) fn require_within_limit(
    field: &str,
    item_id: &str,
    quantity: i64,
) -> Result<(), WorkflowError> {
    if quantity.unsigned_abs() > MAX_LINE_QUANTITY.unsigned_abs() {
        return Err(WorkflowError::validation(format!(
            "{} for item {} exceeds {}, got {}",
            field, item_id, MAX_LINE_QUANTITY, quantity
        )));
    }
    Ok(())
}

/// Reject empty line lists, blank item ids and quantities that are not
/// positive or exceed [`MAX_LINE_QUANTITY`].
pub(crate) fn validate_lines(lines: &[LineItem]) -> Result<(), WorkflowError> {
    if lines.is_empty() {
        return Err(WorkflowError::validation("at least one line item is required"));
    }
    for line in lines {
        if line.item_id.trim().is_empty() {
            return Err(WorkflowError::validation("line item is missing an item id"));
        }
        if line.quantity <= 0 {
            return Err(WorkflowError::validation(format!(
                "quantity for item {} must be positive, got {}",
                line.item_id, line.quantity
            )));
        }
        require_within_limit("quantity", &line.item_id, line.quantity)?;
    }
    Ok(())
}

/// Reject line lists that name the same item twice.
pub(crate) fn require_distinct_items<'a>(
    item_ids: impl IntoIterator<Item = &'a str>,
) -> Result<(), WorkflowError> {
    let mut seen = BTreeSet::new();
    for item_id in item_ids {
        if !seen.insert(item_id) {
            return Err(WorkflowError::validation(format!(
                "item {} appears more than once",
                item_id
            )));
        }
    }
    Ok(())
}

pub(crate) fn ensure_pending(
    id: &str,
    status: RequestStatus,
    action: &'static str,
) -> Result<(), WorkflowError> {
    if status != RequestStatus::Pending {
        return Err(WorkflowError::InvalidState {
            id: id.to_string(),
            status: status.as_str().to_string(),
            action,
        });
    }
    Ok(())
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<(), WorkflowError> {
    if value.trim().is_empty() {
        return Err(WorkflowError::validation(format!("{} is required", field)));
    }
    Ok(())
}

/// Check that a residence id is present and refers to a stored residence.
pub(crate) fn require_residence<S: DocumentStore>(
    tx: &mut Transaction<'_, S>,
    residence_id: &str,
) -> Result<Residence, WorkflowError> {
    require_text("residenceId", residence_id)?;
    tx.get::<Residence>(residence_id)?
        .ok_or_else(|| WorkflowError::validation(format!("unknown residence {}", residence_id)))
}
