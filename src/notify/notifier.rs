use std::sync::{Arc, Mutex};

use super::Notification;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotifyError {
    #[error("notification buffer poisoned")]
    BufferPoisoned,
    #[error("failed to encode notification: {0}")]
    Encode(String),
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

/// Delivers notifications to whoever watches the system.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// A notifier that logs through `tracing`, or appends to a buffer.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier {
    buffer: Option<Arc<Mutex<Vec<Notification>>>>,
}

impl LogNotifier {
    pub fn new() -> Self {
        Self { buffer: None }
    }

    pub fn with_buffer(buffer: Arc<Mutex<Vec<Notification>>>) -> Self {
        Self {
            buffer: Some(buffer),
        }
    }
}

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        match &self.buffer {
            Some(buffer) => {
                let mut buffer = buffer.lock().map_err(|_| NotifyError::BufferPoisoned)?;
                buffer.push(notification.clone());
            }
            None => tracing::info!(
                event = %notification.event,
                reference = %notification.reference,
                actor = %notification.actor,
                residence = notification.residence_id.as_deref().unwrap_or("-"),
                "{}",
                notification.message
            ),
        }
        Ok(())
    }
}
