//! Audit trail collaborator seam.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One recorded audit entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Correlation id (UUIDv7, time-ordered).
    pub id: Uuid,
    pub action: String,
    pub actor: String,
    pub details: String,
    pub recorded_at: DateTime<Utc>,
}

impl AuditEntry {
    fn new(action: &str, actor: &str, details: &str) -> Self {
        Self {
            id: Uuid::now_v7(),
            action: action.to_owned(),
            actor: actor.to_owned(),
            details: details.to_owned(),
            recorded_at: Utc::now(),
        }
    }
}

/// Fire-and-forget audit sink.
///
/// `record` must not block on IO and must not surface failures: the
/// business operation that triggered the entry proceeds regardless of
/// what the sink does with it.
pub trait AuditSink: Send + Sync {
    fn record(&self, action: &str, actor: &str, details: &str);
}

impl<S> AuditSink for std::sync::Arc<S>
where
    S: AuditSink + ?Sized,
{
    fn record(&self, action: &str, actor: &str, details: &str) {
        (**self).record(action, actor, details)
    }
}

/// In-memory sink; keeps entries for inspection (tests, admin views).
#[derive(Debug, Default)]
pub struct InMemoryAuditSink {
    entries: Mutex<Vec<AuditEntry>>,
}

impl InMemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// The most recent `count` entries, oldest first.
    pub fn recent(&self, count: usize) -> Vec<AuditEntry> {
        let entries = self.entries();
        let skip = entries.len().saturating_sub(count);
        entries[skip..].to_vec()
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&self, action: &str, actor: &str, details: &str) {
        // A poisoned lock drops the entry rather than failing the caller.
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(AuditEntry::new(action, actor, details));
        }
    }
}

/// Sink that forwards entries to the `tracing` pipeline.
#[derive(Debug, Default)]
pub struct TracingAuditSink;

impl TracingAuditSink {
    pub fn new() -> Self {
        Self
    }
}

impl AuditSink for TracingAuditSink {
    fn record(&self, action: &str, actor: &str, details: &str) {
        tracing::info!(target: "audit", actor, details, "{action}");
    }
}
