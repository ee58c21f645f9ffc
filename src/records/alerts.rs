//! Escalation alerts and their status lifecycle.
//!
//! States are `pending`, `assigned` and `resolved`. Assign and resolve are
//! accepted from any current status, including a resolved alert being
//! assigned again; nothing archives or removes a resolved alert.

use std::fmt;

use serde_json::Value;
use tracing::info;

use super::error::CycleError;
use super::{timestamp, Operation, RecordError, RecordService};
use crate::document::{Collection, Record};
use crate::store::DocumentStore;

pub const DEFAULT_PRIORITY: &str = "high";
pub const DEFAULT_ASSIGNEE: &str = "management";
pub const DEFAULT_ESCALATION_REASON: &str = "Requires human attention";

const STATUS: &str = "status";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertStatus {
    Pending,
    Assigned,
    Resolved,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Pending => "pending",
            AlertStatus::Assigned => "assigned",
            AlertStatus::Resolved => "resolved",
        }
    }

    /// Whether a record currently carries this status.
    pub fn matches(&self, record: &Record) -> bool {
        record.get(STATUS).and_then(Value::as_str) == Some(self.as_str())
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `body[field]`, or `default` when the field is missing or falsy
/// (null, false, zero, empty text).
fn field_or(body: &Record, field: &str, default: &str) -> Value {
    match body.get(field) {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Value::from(default),
        Some(Value::String(s)) if s.is_empty() => Value::from(default),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Value::from(default),
        Some(value) => value.clone(),
    }
}

impl<S: DocumentStore> RecordService<S> {
    /// Open a new pending alert asking for human attention.
    ///
    /// Only the escalation fields are taken from `body`; `guest_phone` and
    /// `message` are copied when present.
    pub fn escalate(&self, body: Record) -> Result<Record, RecordError> {
        let now = timestamp();
        let collection = Collection::Alerts;

        let alert = self
            .store
            .update(|doc| {
                let mut alert = Record::new();
                alert.set_id(doc.next_id(collection)?);
                alert.copy_field(&body, "guest_phone");
                alert.copy_field(&body, "message");
                alert.set("priority", field_or(&body, "priority", DEFAULT_PRIORITY));
                alert.set(STATUS, AlertStatus::Pending.as_str());
                alert.set("timestamp", field_or(&body, "timestamp", &now));
                alert.set("assigned_to", field_or(&body, "assigned_to", DEFAULT_ASSIGNEE));
                alert.set(
                    "escalation_reason",
                    field_or(&body, "escalation_reason", DEFAULT_ESCALATION_REASON),
                );
                doc.records_mut(collection)?.push(alert.clone());
                Ok::<_, CycleError>(alert)
            })
            .map_err(|e| e.into_record_error(Operation::Create, collection))?;

        info!(id = ?alert.id(), priority = ?alert.get("priority"), "escalation alert opened");
        Ok(alert)
    }

    /// Move an alert to `assigned`, whatever its current status.
    pub fn assign(&self, id: &str, body: Record) -> Result<Record, RecordError> {
        let now = timestamp();
        self.modify(Collection::Alerts, id, Operation::Assign, |alert| {
            alert.set(STATUS, AlertStatus::Assigned.as_str());
            alert.copy_field(&body, "assigned_to");
            alert.set("assigned_at", now);
        })
    }

    /// Move an alert to `resolved`, whatever its current status.
    pub fn resolve(&self, id: &str, body: Record) -> Result<Record, RecordError> {
        let now = timestamp();
        self.modify(Collection::Alerts, id, Operation::Resolve, |alert| {
            alert.set(STATUS, AlertStatus::Resolved.as_str());
            alert.copy_field(&body, "resolution_notes");
            alert.set("resolved_at", now);
            alert.copy_field(&body, "resolved_by");
        })
    }

    /// Alerts whose status is exactly `pending`, in insertion order.
    pub fn pending(&self) -> Vec<Record> {
        self.store.view(|doc| {
            doc.records(Collection::Alerts)
                .iter()
                .filter(|alert| AlertStatus::Pending.matches(alert))
                .cloned()
                .collect()
        })
    }
}
