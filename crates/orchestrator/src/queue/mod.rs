//! Shared task queue: an append-only ledger of primitive operations.
//!
//! One queue serves every in-flight expression. Evaluation drivers append
//! tasks and hold a per-task oneshot receiver; workers discover tasks through
//! [`TaskQueue::poll_next`] and report through [`TaskQueue::submit`]. Results
//! are correlated strictly by task id, never by position, so concurrent
//! drivers can never observe each other's results.
//!
//! The ledger is never compacted; it trades memory growth for simplicity and
//! auditability over the process lifetime.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::compiler::Op;
use crate::error::FailureKind;

/// Globally unique, sequentially assigned task identifier.
pub type TaskId = u64;

/// One atomic binary operation extracted from an expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Ledger-wide unique id, never reused.
    pub id: TaskId,
    /// The operator to apply.
    pub operation: Op,
    /// Left operand.
    pub arg1: f64,
    /// Right operand.
    pub arg2: f64,
    /// Worker-side compute deadline in milliseconds.
    pub timeout_ms: u64,
}

/// Structured failure reported by a worker for one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskError {
    /// Failure classification, mapped onto the expression by the driver.
    pub kind: FailureKind,
    /// Human-readable description.
    pub message: String,
}

/// Outcome of executing one task, reported by a worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResult {
    /// Id of the task this result belongs to.
    pub id: TaskId,
    /// Computed value, if the operation succeeded.
    pub value: Option<f64>,
    /// Failure, if it did not.
    pub error: Option<TaskError>,
}

/// Outcome of recording a task result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// First result for this task; recorded and forwarded to the waiter.
    Recorded,
    /// A result was already recorded; first result wins, this one is dropped.
    Duplicate,
    /// No task with this id was ever issued.
    UnknownTask,
}

#[derive(Default)]
struct Ledger {
    tasks: Vec<Task>,
    results: HashMap<TaskId, TaskResult>,
    waiters: HashMap<TaskId, oneshot::Sender<TaskResult>>,
}

/// The shared task queue service.
///
/// All mutation happens under one internal lock; no lock is ever held across
/// an await point.
#[derive(Default)]
pub struct TaskQueue {
    ledger: Mutex<Ledger>,
}

impl TaskQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new task and register a waiter for its result.
    ///
    /// Returns the assigned id together with the receiver the calling driver
    /// suspends on. Ids are the ledger length at insertion time, which keeps
    /// them sequential and unique for the process lifetime.
    pub fn enqueue(
        &self,
        operation: Op,
        arg1: f64,
        arg2: f64,
        budget: Duration,
    ) -> (TaskId, oneshot::Receiver<TaskResult>) {
        let (tx, rx) = oneshot::channel();
        let mut ledger = self.lock();
        let id = ledger.tasks.len() as TaskId;
        ledger.tasks.push(Task {
            id,
            operation,
            arg1,
            arg2,
            timeout_ms: budget.as_millis() as u64,
        });
        ledger.waiters.insert(id, tx);
        tracing::debug!(task_id = id, operation = %operation, "Task enqueued");
        (id, rx)
    }

    /// The least-recently-created task that has no recorded result yet.
    ///
    /// Non-destructive: until a result is submitted, repeated polls observe
    /// the same task. Duplicate completions are resolved by first result wins.
    pub fn poll_next(&self) -> Option<Task> {
        let ledger = self.lock();
        ledger
            .tasks
            .iter()
            .find(|task| !ledger.results.contains_key(&task.id))
            .cloned()
    }

    /// Record a task result and wake the waiting driver.
    ///
    /// A result for an already-resolved task is a no-op; a result for an id
    /// that was never issued is rejected. A result arriving after the driver
    /// gave up is still recorded in the ledger, but the closed waiter channel
    /// means nobody ever observes it.
    pub fn submit(&self, result: TaskResult) -> SubmitOutcome {
        let mut ledger = self.lock();
        let id = result.id;
        if id >= ledger.tasks.len() as TaskId {
            return SubmitOutcome::UnknownTask;
        }
        if ledger.results.contains_key(&id) {
            return SubmitOutcome::Duplicate;
        }
        ledger.results.insert(id, result.clone());
        if let Some(waiter) = ledger.waiters.remove(&id) {
            // The driver may already have timed out; a closed channel is fine.
            let _ = waiter.send(result);
        }
        SubmitOutcome::Recorded
    }

    /// Number of tasks appended so far (resolved or not).
    pub fn len(&self) -> usize {
        self.lock().tasks.len()
    }

    /// Whether any task has ever been appended.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of tasks still awaiting a result.
    pub fn pending(&self) -> usize {
        let ledger = self.lock();
        ledger.tasks.len() - ledger.results.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Ledger> {
        // A poisoned ledger mutex means a panic while appending; the data is
        // still structurally sound, so keep serving.
        match self.ledger.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_result(id: TaskId, value: f64) -> TaskResult {
        TaskResult {
            id,
            value: Some(value),
            error: None,
        }
    }

    #[test]
    fn test_poll_order_is_fifo() {
        let queue = TaskQueue::new();
        let budget = Duration::from_millis(50);
        let (first, _rx1) = queue.enqueue(Op::Add, 1.0, 2.0, budget);
        let (second, _rx2) = queue.enqueue(Op::Mul, 3.0, 4.0, budget);

        assert_eq!(queue.poll_next().map(|t| t.id), Some(first));
        // Unresolved tasks stay observable.
        assert_eq!(queue.poll_next().map(|t| t.id), Some(first));

        queue.submit(ok_result(first, 3.0));
        assert_eq!(queue.poll_next().map(|t| t.id), Some(second));

        queue.submit(ok_result(second, 12.0));
        assert!(queue.poll_next().is_none());
    }

    #[test]
    fn test_ids_are_sequential() {
        let queue = TaskQueue::new();
        let budget = Duration::from_millis(50);
        for expected in 0..5u64 {
            let (id, _rx) = queue.enqueue(Op::Add, 0.0, 0.0, budget);
            assert_eq!(id, expected);
        }
        assert_eq!(queue.len(), 5);
        assert_eq!(queue.pending(), 5);
    }

    #[tokio::test]
    async fn test_first_result_wins() {
        let queue = TaskQueue::new();
        let (id, rx) = queue.enqueue(Op::Div, 8.0, 2.0, Duration::from_millis(50));

        assert_eq!(queue.submit(ok_result(id, 4.0)), SubmitOutcome::Recorded);
        assert_eq!(queue.submit(ok_result(id, 99.0)), SubmitOutcome::Duplicate);

        let delivered = rx.await.expect("waiter should receive the first result");
        assert_eq!(delivered.value, Some(4.0));
    }

    #[test]
    fn test_unknown_task_rejected() {
        let queue = TaskQueue::new();
        assert_eq!(
            queue.submit(ok_result(42, 1.0)),
            SubmitOutcome::UnknownTask
        );
    }

    #[tokio::test]
    async fn test_waiters_are_correlated_by_id() {
        let queue = TaskQueue::new();
        let budget = Duration::from_millis(50);
        let (first, rx1) = queue.enqueue(Op::Add, 1.0, 1.0, budget);
        let (second, rx2) = queue.enqueue(Op::Add, 2.0, 2.0, budget);

        // Resolve out of order: the second task completes first.
        queue.submit(ok_result(second, 4.0));
        queue.submit(ok_result(first, 2.0));

        assert_eq!(rx1.await.unwrap().value, Some(2.0));
        assert_eq!(rx2.await.unwrap().value, Some(4.0));
    }

    #[test]
    fn test_late_result_is_recorded_but_unobserved() {
        let queue = TaskQueue::new();
        let (id, rx) = queue.enqueue(Op::Add, 1.0, 1.0, Duration::from_millis(50));

        // Driver gave up and dropped its receiver.
        drop(rx);

        assert_eq!(queue.submit(ok_result(id, 2.0)), SubmitOutcome::Recorded);
        assert_eq!(queue.pending(), 0);
    }
}
