//! Error types for command handlers.

use crate::workflow::WorkflowError;

/// Error type for command handler operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandlerError {
    /// No handler registered for this command name.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// Payload decode / deserialization failed.
    #[error("decode failed: {0}")]
    DecodeFailed(String),

    /// Guard rejected the command (input shape check failed).
    #[error("guard rejected command: {0}")]
    GuardRejected(String),

    /// Input was well-formed but not acceptable.
    #[error("{0}")]
    Validation(String),

    /// No identity in the session.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Identity present but not allowed to perform the command.
    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// The target's current state does not allow the command.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("rate limited, retry after {retry_after}s")]
    RateLimited { retry_after: u64 },

    /// Contention or storage failure; nothing was written.
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        HandlerError::DecodeFailed(err.to_string())
    }
}

impl From<WorkflowError> for HandlerError {
    fn from(err: WorkflowError) -> Self {
        let message = err.to_string();
        match err {
            WorkflowError::Validation(_) | WorkflowError::InsufficientStock { .. } => {
                HandlerError::Validation(message)
            }
            WorkflowError::Forbidden(_) => HandlerError::Forbidden(message),
            WorkflowError::NotFound { .. } => HandlerError::NotFound(message),
            WorkflowError::AlreadyExists { .. } | WorkflowError::InvalidState { .. } => {
                HandlerError::Conflict(message)
            }
            WorkflowError::Contention { .. } | WorkflowError::Store(_) => {
                HandlerError::Unavailable(message)
            }
        }
    }
}

impl HandlerError {
    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::UnknownCommand(_) => 404,
            HandlerError::DecodeFailed(_) => 400,
            HandlerError::GuardRejected(_) => 400,
            HandlerError::Validation(_) => 400,
            HandlerError::Unauthorized(_) => 401,
            HandlerError::Forbidden(_) => 403,
            HandlerError::NotFound(_) => 404,
            HandlerError::Conflict(_) => 409,
            HandlerError::RateLimited { .. } => 429,
            HandlerError::Unavailable(_) => 500,
        }
    }
}
