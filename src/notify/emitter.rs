use std::sync::Mutex;

use event_emitter_rs::EventEmitter;

use super::{Notification, Notifier, NotifyError};

/// Emits each notification as JSON on an in-process [`EventEmitter`],
/// keyed by the notification's event name.
pub struct EmitterNotifier {
    emitter: Mutex<EventEmitter>,
}

impl EmitterNotifier {
    pub fn new(emitter: EventEmitter) -> Self {
        Self {
            emitter: Mutex::new(emitter),
        }
    }

    /// Register a listener for an event name. Listeners run on their own
    /// threads and receive the notification serialized as JSON.
    pub fn on<F>(&self, event: &str, listener: F) -> Result<(), NotifyError>
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        let mut emitter = self.emitter.lock().map_err(|_| NotifyError::BufferPoisoned)?;
        emitter.on(event, listener);
        Ok(())
    }
}

impl Notifier for EmitterNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let payload = serde_json::to_string(notification)
            .map_err(|err| NotifyError::Encode(err.to_string()))?;
        let mut emitter = self
            .emitter
            .lock()
            .map_err(|_| NotifyError::Delivery("emitter lock poisoned".into()))?;
        emitter.emit(&notification.event, payload);
        Ok(())
    }
}
