//! microsvc - convention-based command handler framework.
//!
//! Commands are registered on a `Service` by name. Each handler receives a
//! `Context<R>` with access to the input payload, session variables, and the
//! application state the service was built with.
//!
//! ## Handler Convention
//!
//! Each handler file follows this convention:
//!
//! ```ignore
//! // src/handlers/miv_issue.rs
//!
//! pub const COMMAND: &str = "miv.issue";
//!
//! pub fn guard<R>(ctx: &microsvc::Context<R>) -> bool {
//!     ctx.has_text("residenceId") && ctx.has_items("items")
//! }
//!
//! pub fn handle<S: DocumentStore>(
//!     ctx: &microsvc::Context<InventoryService<S>>,
//! ) -> Result<Value, microsvc::HandlerError> {
//!     let actor = ctx.actor()?;
//!     let created = ctx.inventory().issue_miv(&actor, ctx.input()?)?;
//!     Ok(serde_json::to_value(created)?)
//! }
//! ```

mod context;
mod error;
mod service;
mod session;

pub use context::Context;
pub use error::HandlerError;
pub use service::{CommandRequest, CommandResponse, Service};
pub use session::{Session, USER_ID, USER_RESIDENCES, USER_ROLE};

// HTTP transport (requires "http" feature)
#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::{router, serve};

/// Register handler modules with a service using the convention pattern.
///
/// Each handler module must export:
/// - `COMMAND: &str` - the command name
/// - `guard(ctx) -> bool` - input shape check
/// - `handle(ctx) -> Result<Value, HandlerError>` - the handler
///
/// # Example
/// ```ignore
/// let service = estatecare::register_handlers!(
///     microsvc::Service::new(inventory),
///     handlers::mrv_receive,
///     handlers::miv_issue,
/// );
/// ```
#[macro_export]
macro_rules! register_handlers {
    ($service:expr, $( $($seg:ident)::+ ),+ $(,)?) => {
        $service
        $(
            .command_guarded(
                $($seg)::+::COMMAND,
                $($seg)::+::guard,
                $($seg)::+::handle,
            )
        )+
    };
}
