use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An event worth telling administrators about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Dotted event name, e.g. `transfer.requested`.
    pub event: String,
    /// Canonical id of the workflow document involved.
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residence_id: Option<String>,
    pub actor: String,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        event: impl Into<String>,
        reference: impl Into<String>,
        actor: impl Into<String>,
        message: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            event: event.into(),
            reference: reference.into(),
            residence_id: None,
            actor: actor.into(),
            message: message.into(),
            at,
        }
    }

    pub fn for_residence(mut self, residence_id: impl Into<String>) -> Self {
        self.residence_id = Some(residence_id.into());
        self
    }
}
