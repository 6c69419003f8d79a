use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::WorkflowError;

/// What an actor is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Every residence and the maintenance commands.
    Admin,
    /// Assigned residences; may approve receipts.
    Manager,
    /// Assigned residences only.
    Staff,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Staff => "staff",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "staff" => Ok(Role::Staff),
            other => Err(WorkflowError::Forbidden(format!("unknown role '{}'", other))),
        }
    }
}

/// The authenticated user performing a workflow action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub role: Role,
    pub residences: BTreeSet<String>,
}

impl Actor {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
            residences: BTreeSet::new(),
        }
    }

    pub fn admin(user_id: impl Into<String>) -> Self {
        Self::new(user_id, Role::Admin)
    }

    pub fn with_residences<I, T>(mut self, residences: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.residences
            .extend(residences.into_iter().map(Into::into));
        self
    }

    pub fn can_access(&self, residence_id: &str) -> bool {
        self.role == Role::Admin || self.residences.contains(residence_id)
    }

    pub fn require_access(&self, residence_id: &str) -> Result<(), WorkflowError> {
        if self.can_access(residence_id) {
            Ok(())
        } else {
            Err(WorkflowError::Forbidden(format!(
                "{} is not assigned to residence {}",
                self.user_id, residence_id
            )))
        }
    }

    /// Access plus a role that may approve or reject receipts.
    pub fn require_approver(&self, residence_id: &str) -> Result<(), WorkflowError> {
        if self.role == Role::Staff {
            return Err(WorkflowError::Forbidden(format!(
                "{} has role staff and cannot approve",
                self.user_id
            )));
        }
        self.require_access(residence_id)
    }

    pub fn require_admin(&self) -> Result<(), WorkflowError> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(WorkflowError::Forbidden(format!(
                "{} is not an admin",
                self.user_id
            )))
        }
    }
}
