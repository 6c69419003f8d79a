//! Best-effort notifications raised after a workflow commits.
//!
//! Notifiers run outside the transaction. A failing notifier is logged by the
//! caller and never undoes or fails the operation that triggered it.
//!
//! - [`LogNotifier`] writes through `tracing`, or into a shared buffer for tests
//! - [`EmitterNotifier`] fans out to in-process listeners (requires `emitter`)

mod notification;
mod notifier;

#[cfg(feature = "emitter")]
mod emitter;

pub use notification::Notification;
pub use notifier::{LogNotifier, Notifier, NotifyError};

#[cfg(feature = "emitter")]
pub use emitter::EmitterNotifier;
