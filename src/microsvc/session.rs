//! Session variables taken from the request headers.

use std::collections::HashMap;

pub const USER_ID: &str = "x-user-id";
pub const USER_ROLE: &str = "x-user-role";
/// Comma-separated residence ids the user is assigned to.
pub const USER_RESIDENCES: &str = "x-user-residences";

/// Parsed session variables from the incoming request.
///
/// Identity is established upstream; the service trusts these values:
///
/// ```json
/// {
///   "x-user-id": "user-42",
///   "x-user-role": "manager",
///   "x-user-residences": "res-1,res-2"
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Session {
    variables: HashMap<String, String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(variables: HashMap<String, String>) -> Self {
        let variables = variables
            .into_iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v))
            .collect();
        Self { variables }
    }

    /// Session for a user with the given role and residences.
    pub fn for_user(user_id: &str, role: &str, residences: &[&str]) -> Self {
        let mut session = Self::new();
        session.set(USER_ID, user_id);
        session.set(USER_ROLE, role);
        session.set(USER_RESIDENCES, residences.join(","));
        session
    }

    pub fn user_id(&self) -> Option<&str> {
        self.get(USER_ID).filter(|id| !id.trim().is_empty())
    }

    pub fn role(&self) -> Option<&str> {
        self.get(USER_ROLE)
    }

    /// Assigned residence ids, blanks dropped.
    pub fn residences(&self) -> Vec<&str> {
        self.get(USER_RESIDENCES)
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(|v| v.as_str())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables
            .insert(key.into().to_ascii_lowercase(), value.into());
    }
}
