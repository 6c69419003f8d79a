use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::clock::{Clock, SystemClock};
use crate::counter::{self, DocumentId, DocumentKind, Period};
use crate::notify::{LogNotifier, Notification, Notifier};
use crate::store::DocumentStore;
use crate::transaction::{self, Transaction, TransactionOptions};

use super::WorkflowError;

/// Entry point for every inventory workflow action.
///
/// Owns the store plus the collaborators each action needs. Every action runs
/// as one optimistic transaction: id reservation, stock changes, log rows and
/// the workflow document commit together or not at all.
pub struct InventoryService<S> {
    store: S,
    options: TransactionOptions,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
}

impl<S: DocumentStore> InventoryService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            options: TransactionOptions::default(),
            clock: Arc::new(SystemClock),
            notifier: Arc::new(LogNotifier::new()),
        }
    }

    pub fn with_options(mut self, options: TransactionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn options(&self) -> &TransactionOptions {
        &self.options
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub(crate) fn transact<T, F>(&self, body: F) -> Result<T, WorkflowError>
    where
        F: FnMut(&mut Transaction<'_, S>) -> Result<T, WorkflowError>,
    {
        transaction::run(&self.store, &self.options, body)
    }

    /// Deliver a notification; failures are logged and swallowed.
    pub(crate) fn notify(&self, notification: Notification) {
        if let Err(err) = self.notifier.notify(&notification) {
            tracing::warn!(
                event = %notification.event,
                reference = %notification.reference,
                error = %err,
                "notification failed"
            );
        }
    }
}

/// Reserve the next id for `kind` in the month of `at`.
pub(crate) fn reserve_id<S: DocumentStore>(
    tx: &mut Transaction<'_, S>,
    kind: DocumentKind,
    at: &DateTime<Utc>,
) -> Result<DocumentId, WorkflowError> {
    Ok(counter::reserve(tx, kind, Period::of(at))?)
}
