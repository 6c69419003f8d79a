//! Service - command registry and dispatch.
//!
//! `Service<R>` owns the application state (an `InventoryService` in the
//! binary) and a sorted table of named commands. Dispatch builds a
//! `Context<R>`, checks the caller's identity when the service requires one,
//! runs the command's guard, then its handler.
//!
//! ## Example
//!
//! ```ignore
//! use estatecare::microsvc::{Service, Session};
//! use serde_json::json;
//!
//! let service = Service::new(inventory)
//!     .command("ping", |_ctx| Ok(json!({ "pong": true })));
//!
//! let result = service.dispatch("ping", json!({}), Session::new());
//! ```

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use super::context::Context;
use super::error::HandlerError;
use super::session::Session;

type Guard<R> = Box<dyn Fn(&Context<R>) -> bool + Send + Sync>;
type Handle<R> = Box<dyn Fn(&Context<R>) -> Result<Value, HandlerError> + Send + Sync>;

struct Registered<R> {
    guard: Option<Guard<R>>,
    handle: Handle<R>,
}

/// Routes named commands to handler functions.
pub struct Service<R> {
    inventory: R,
    commands: BTreeMap<String, Registered<R>>,
    require_identity: bool,
}

impl<R: Send + Sync + 'static> Service<R> {
    pub fn new(inventory: R) -> Self {
        Self {
            inventory,
            commands: BTreeMap::new(),
            require_identity: false,
        }
    }

    /// Refuse anonymous sessions with [`HandlerError::Unauthorized`] before
    /// any guard sees the input.
    pub fn require_identity(mut self) -> Self {
        self.require_identity = true;
        self
    }

    /// Register a command with no input guard.
    pub fn command<F>(self, name: &str, handler: F) -> Self
    where
        F: Fn(&Context<R>) -> Result<Value, HandlerError> + Send + Sync + 'static,
    {
        self.register(name, None, Box::new(handler))
    }

    /// Register a command whose guard must accept the input first.
    ///
    /// A guard returning `false` fails the dispatch with
    /// [`HandlerError::GuardRejected`] and the handler never runs.
    pub fn command_guarded<G, F>(self, name: &str, guard: G, handler: F) -> Self
    where
        G: Fn(&Context<R>) -> bool + Send + Sync + 'static,
        F: Fn(&Context<R>) -> Result<Value, HandlerError> + Send + Sync + 'static,
    {
        self.register(name, Some(Box::new(guard)), Box::new(handler))
    }

    fn register(mut self, name: &str, guard: Option<Guard<R>>, handle: Handle<R>) -> Self {
        if self.commands.contains_key(name) {
            tracing::warn!(command = name, "command registered twice, keeping the last");
        }
        self.commands
            .insert(name.to_string(), Registered { guard, handle });
        self
    }

    pub fn dispatch(
        &self,
        command: &str,
        input: Value,
        session: Session,
    ) -> Result<Value, HandlerError> {
        let registered = self
            .commands
            .get(command)
            .ok_or_else(|| HandlerError::UnknownCommand(command.to_string()))?;

        let span = tracing::debug_span!("command", name = command, user = session.user_id());
        let _entered = span.enter();

        let ctx = Context::new(command.to_string(), input, session, &self.inventory);
        if self.require_identity {
            ctx.user_id()?;
        }
        if let Some(guard) = &registered.guard {
            if !guard(&ctx) {
                tracing::debug!("input rejected by guard");
                return Err(HandlerError::GuardRejected(ctx.command_name().to_string()));
            }
        }

        let result = (registered.handle)(&ctx);
        if let Err(err) = &result {
            tracing::debug!(status = err.status_code(), error = %err, "command failed");
        }
        result
    }

    /// Dispatch a [`CommandRequest`], folding errors into the response.
    pub fn dispatch_request(&self, request: &CommandRequest) -> CommandResponse {
        let session = Session::from_map(request.session_variables.clone());
        match self.dispatch(&request.command, request.input.clone(), session) {
            Ok(body) => CommandResponse { status: 200, body },
            Err(err) => CommandResponse {
                status: err.status_code(),
                body: serde_json::json!({ "error": err.to_string() }),
            },
        }
    }

    /// Registered command names in sorted order.
    pub fn commands(&self) -> Vec<&str> {
        self.commands.keys().map(String::as_str).collect()
    }

    pub fn has_command(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn inventory(&self) -> &R {
        &self.inventory
    }
}

/// A command addressed to the service outside HTTP.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CommandRequest {
    pub command: String,
    pub input: Value,
    /// Header-style session variables (`x-user-id`, `x-user-role`, ...).
    #[serde(default)]
    pub session_variables: HashMap<String, String>,
}

/// Outcome of [`Service::dispatch_request`].
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CommandResponse {
    /// HTTP-style status code.
    pub status: u16,
    /// Handler output, or `{ "error": ... }`.
    pub body: Value,
}
