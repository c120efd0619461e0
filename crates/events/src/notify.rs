//! Notification collaborator seam.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::audit::AuditSink;

/// Delivery failure reported by a [`NotificationSink`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotifyError {
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

/// One outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub recipient: String,
    pub subject: String,
    pub message: String,
}

/// Best-effort delivery channel (email, SMS, ...).
pub trait NotificationSink: Send + Sync {
    fn send(&self, recipient: &str, subject: &str, message: &str) -> Result<(), NotifyError>;
}

impl<S> NotificationSink for Arc<S>
where
    S: NotificationSink + ?Sized,
{
    fn send(&self, recipient: &str, subject: &str, message: &str) -> Result<(), NotifyError> {
        (**self).send(recipient, subject, message)
    }
}

/// In-memory sink for tests/dev; can be switched into a failing mode.
#[derive(Debug, Default)]
pub struct InMemoryNotificationSink {
    sent: Mutex<Vec<Notification>>,
    failing: AtomicBool,
}

impl InMemoryNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose every delivery attempt fails.
    pub fn failing() -> Self {
        let sink = Self::default();
        sink.failing.store(true, Ordering::Relaxed);
        sink
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

impl NotificationSink for InMemoryNotificationSink {
    fn send(&self, recipient: &str, subject: &str, message: &str) -> Result<(), NotifyError> {
        if self.failing.load(Ordering::Relaxed) {
            return Err(NotifyError::Delivery("delivery channel down".to_owned()));
        }

        if let Ok(mut sent) = self.sent.lock() {
            sent.push(Notification {
                recipient: recipient.to_owned(),
                subject: subject.to_owned(),
                message: message.to_owned(),
            });
        }
        Ok(())
    }
}

/// Best-effort sender: delivery failures are swallowed and recorded via
/// the audit sink so they never abort the triggering business operation.
#[derive(Clone)]
pub struct Notifier {
    sink: Arc<dyn NotificationSink>,
    audit: Arc<dyn AuditSink>,
}

impl Notifier {
    pub fn new(sink: Arc<dyn NotificationSink>, audit: Arc<dyn AuditSink>) -> Self {
        Self { sink, audit }
    }

    pub fn send(&self, recipient: &str, subject: &str, message: &str) {
        match self.sink.send(recipient, subject, message) {
            Ok(()) => self.audit.record(
                "NOTIFICATION sent",
                "system",
                &format!("{subject} - recipient: {recipient}"),
            ),
            Err(err) => self.audit.record(
                "NOTIFICATION failed",
                "system",
                &format!("{subject} - recipient: {recipient} - {err}"),
            ),
        }
    }
}

impl core::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Notifier").finish_non_exhaustive()
    }
}
