//! Context passed to command handlers.
//!
//! Carries the parsed input, session variables, and a reference to the
//! inventory service. Handlers reach everything they need through it.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::workflow::{Actor, Role};

use super::error::HandlerError;
use super::session::Session;

/// The context passed to every command handler.
///
/// Generic over `R`, the application state the service was built with.
pub struct Context<'a, R> {
    command_name: String,
    input: Value,
    session: Session,
    inventory: &'a R,
}

impl<'a, R> Context<'a, R> {
    pub(crate) fn new(command_name: String, input: Value, session: Session, inventory: &'a R) -> Self {
        Self {
            command_name,
            input,
            session,
            inventory,
        }
    }

    /// Deserialize the input payload into a typed struct.
    pub fn input<T: DeserializeOwned>(&self) -> Result<T, HandlerError> {
        serde_json::from_value(self.input.clone())
            .map_err(|e| HandlerError::DecodeFailed(e.to_string()))
    }

    pub fn raw_input(&self) -> &Value {
        &self.input
    }

    pub fn command_name(&self) -> &str {
        &self.command_name
    }

    /// User ID from the session; `Unauthorized` if absent.
    pub fn user_id(&self) -> Result<&str, HandlerError> {
        self.session
            .user_id()
            .ok_or_else(|| HandlerError::Unauthorized("missing user ID in session".into()))
    }

    pub fn role(&self) -> Option<&str> {
        self.session.role()
    }

    /// Build the acting user from the session.
    pub fn actor(&self) -> Result<Actor, HandlerError> {
        let user_id = self.user_id()?;
        let role: Role = self
            .role()
            .ok_or_else(|| HandlerError::Unauthorized("missing user role in session".into()))?
            .parse()?;
        Ok(Actor::new(user_id, role).with_residences(self.session.residences()))
    }

    pub fn inventory(&self) -> &R {
        self.inventory
    }

    /// True when `field` is a non-empty string.
    pub fn has_text(&self, field: &str) -> bool {
        self.input
            .get(field)
            .and_then(Value::as_str)
            .is_some_and(|s| !s.trim().is_empty())
    }

    /// True when `field` is a non-empty array.
    pub fn has_items(&self, field: &str) -> bool {
        self.input
            .get(field)
            .and_then(Value::as_array)
            .is_some_and(|items| !items.is_empty())
    }
}
