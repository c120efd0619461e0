//! Collaborator sinks consumed by the hotel core.
//!
//! The audit trail is **fire-and-forget**: recording never blocks or
//! fails the triggering business operation. Notifications are
//! **best-effort**: delivery failures are swallowed and surface only as
//! audit entries.

pub mod audit;
pub mod notify;

pub use audit::{AuditEntry, AuditSink, InMemoryAuditSink, TracingAuditSink};
pub use notify::{
    InMemoryNotificationSink, Notification, NotificationSink, Notifier, NotifyError,
};
