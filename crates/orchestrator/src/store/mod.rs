//! Expression records and the persistence boundary.
//!
//! Durable storage is an external collaborator: the orchestrator only needs
//! to create a record, persist status transitions, and read records back.
//! [`ExpressionStore`] is that seam; [`MemoryStore`] is the in-process
//! implementation used by the server.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EvalError, FailureKind};

/// Identifier assigned to an expression at creation, never reused.
pub type ExpressionId = i64;

/// Lifecycle state of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpressionStatus {
    /// Accepted, evaluation not started yet.
    Pending,
    /// An evaluation driver is walking the postfix sequence.
    Evaluating,
    /// Terminal: evaluation produced a value.
    Succeeded,
    /// Terminal: evaluation failed (`error_kind` says how).
    Failed,
    /// Terminal: a task result never arrived within budget.
    TimedOut,
}

/// A client-submitted expression and its asynchronous evaluation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionRecord {
    /// Assigned at creation.
    pub id: ExpressionId,
    /// Current lifecycle state.
    pub status: ExpressionStatus,
    /// Final value; set only on success.
    pub result: Option<f64>,
    /// Failure classification; set only on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<FailureKind>,
    /// Failure message; set only on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Opaque owner identity; authorization happens at the query boundary.
    #[serde(skip)]
    pub owner: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl ExpressionRecord {
    /// Apply the terminal transition for a finished evaluation.
    ///
    /// Called exactly once per expression by its evaluation driver.
    pub fn finish(&mut self, outcome: Result<f64, EvalError>) {
        match outcome {
            Ok(value) => {
                self.status = ExpressionStatus::Succeeded;
                self.result = Some(value);
            }
            Err(err) => {
                self.status = match err.kind() {
                    FailureKind::Timeout => ExpressionStatus::TimedOut,
                    _ => ExpressionStatus::Failed,
                };
                self.error_kind = Some(err.kind());
                self.error = Some(err.to_string());
            }
        }
    }
}

/// Persistence boundary for expression records.
pub trait ExpressionStore: Send + Sync {
    /// Allocate an id and persist a new `Pending` record.
    fn create(&self, owner: &str) -> ExpressionRecord;

    /// Persist a status/result transition for an existing record.
    fn update(&self, record: ExpressionRecord);

    /// Fetch one record by id.
    fn get(&self, id: ExpressionId) -> Option<ExpressionRecord>;

    /// All records belonging to an owner, oldest first.
    fn list_for_owner(&self, owner: &str) -> Vec<ExpressionRecord>;
}

/// In-memory store backing the orchestrator process.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<ExpressionId, ExpressionRecord>>,
    next_id: AtomicI64,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<ExpressionId, ExpressionRecord>> {
        match self.records.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl ExpressionStore for MemoryStore {
    fn create(&self, owner: &str) -> ExpressionRecord {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let record = ExpressionRecord {
            id,
            status: ExpressionStatus::Pending,
            result: None,
            error_kind: None,
            error: None,
            owner: owner.to_string(),
            created_at: Utc::now(),
        };
        self.lock().insert(id, record.clone());
        record
    }

    fn update(&self, record: ExpressionRecord) {
        self.lock().insert(record.id, record);
    }

    fn get(&self, id: ExpressionId) -> Option<ExpressionRecord> {
        self.lock().get(&id).cloned()
    }

    fn list_for_owner(&self, owner: &str) -> Vec<ExpressionRecord> {
        let mut records: Vec<ExpressionRecord> = self
            .lock()
            .values()
            .filter(|record| record.owner == owner)
            .cloned()
            .collect();
        records.sort_by_key(|record| record.id);
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_assigns_sequential_ids() {
        let store = MemoryStore::new();
        let a = store.create("alice");
        let b = store.create("alice");
        assert_ne!(a.id, b.id);
        assert_eq!(a.status, ExpressionStatus::Pending);
    }

    #[test]
    fn test_finish_success() {
        let store = MemoryStore::new();
        let mut record = store.create("alice");
        record.finish(Ok(77.0));
        store.update(record.clone());

        let fetched = store.get(record.id).unwrap();
        assert_eq!(fetched.status, ExpressionStatus::Succeeded);
        assert_eq!(fetched.result, Some(77.0));
        assert!(fetched.error.is_none());
    }

    #[test]
    fn test_finish_failure_kinds() {
        let mut record = MemoryStore::new().create("alice");
        record.finish(Err(EvalError::Invalid("division by zero".into())));
        assert_eq!(record.status, ExpressionStatus::Failed);
        assert_eq!(record.error_kind, Some(FailureKind::Invalid));
        assert!(record.result.is_none());

        let mut record = MemoryStore::new().create("alice");
        record.finish(Err(EvalError::Timeout));
        assert_eq!(record.status, ExpressionStatus::TimedOut);
        assert_eq!(record.error_kind, Some(FailureKind::Timeout));
    }

    #[test]
    fn test_list_is_scoped_to_owner() {
        let store = MemoryStore::new();
        store.create("alice");
        store.create("bob");
        store.create("alice");

        let records = store.list_for_owner("alice");
        assert_eq!(records.len(), 2);
        assert!(records.windows(2).all(|w| w[0].id < w[1].id));
        assert!(store.list_for_owner("carol").is_empty());
    }

    #[test]
    fn test_owner_is_not_serialized() {
        let record = MemoryStore::new().create("alice");
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("alice"));
        assert!(json.contains("pending"));
    }
}
