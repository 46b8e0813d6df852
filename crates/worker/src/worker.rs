//! Worker lifecycle: polling loops and deadline-bounded execution.

use std::time::Duration;

use anyhow::Result;
use uuid::Uuid;

use crate::client::{FailureKind, OrchestratorClient, Task, TaskError, TaskResult};
use crate::config::WorkerConfig;
use crate::executor;

/// A pool of stateless polling loops against one orchestrator.
pub struct Worker {
    config: WorkerConfig,
    client: OrchestratorClient,
}

impl Worker {
    /// Create a new worker pool.
    pub fn new(config: WorkerConfig) -> Self {
        let client = OrchestratorClient::new(&config.server_url);
        Self { config, client }
    }

    /// Run `computing_power` polling loops until the process is stopped.
    pub async fn run(&self) -> Result<()> {
        let mut handles = Vec::new();

        for _ in 0..self.config.computing_power {
            let client = self.client.clone();
            let interval = self.config.poll_interval;
            let worker_id = Uuid::new_v4();
            handles.push(tokio::spawn(poll_loop(client, interval, worker_id)));
        }

        tracing::info!(
            computing_power = self.config.computing_power,
            server_url = %self.config.server_url,
            "Worker pool running"
        );

        for handle in handles {
            handle.await?;
        }

        Ok(())
    }
}

/// One polling loop: sleep, poll, compute, report, repeat.
///
/// Failures are local to one iteration; the loop never stops on its own.
async fn poll_loop(client: OrchestratorClient, interval: Duration, worker_id: Uuid) {
    tracing::info!(%worker_id, "Worker loop started");

    loop {
        tokio::time::sleep(interval).await;

        match client.poll_task().await {
            Ok(Some(task)) => {
                tracing::debug!(
                    %worker_id,
                    task_id = task.id,
                    operation = %task.operation,
                    "Task received"
                );

                let result = execute_with_deadline(&task).await;

                if let Err(e) = client.submit_result(&result).await {
                    tracing::warn!(
                        %worker_id,
                        task_id = task.id,
                        error = %e,
                        "Failed to submit task result"
                    );
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(%worker_id, error = %e, "Poll failed");
            }
        }
    }
}

/// Execute one task concurrently with its timeout budget.
///
/// Exactly one result is produced per observed task: the computed value, the
/// operation's own failure, or a timeout error when the deadline elapses
/// first.
async fn execute_with_deadline(task: &Task) -> TaskResult {
    let budget = Duration::from_millis(task.timeout_ms);
    let (id, operation, arg1, arg2) = (task.id, task.operation, task.arg1, task.arg2);

    let computation = tokio::task::spawn_blocking(move || executor::execute(operation, arg1, arg2));

    match tokio::time::timeout(budget, computation).await {
        Ok(Ok(Ok(value))) => TaskResult {
            id,
            value: Some(value),
            error: None,
        },
        Ok(Ok(Err(error))) => TaskResult {
            id,
            value: None,
            error: Some(error),
        },
        Ok(Err(join_error)) => TaskResult {
            id,
            value: None,
            error: Some(TaskError {
                kind: FailureKind::Internal,
                message: format!("computation panicked: {join_error}"),
            }),
        },
        Err(_) => {
            tracing::warn!(task_id = id, "Task exceeded its timeout budget");
            TaskResult {
                id,
                value: None,
                error: Some(TaskError {
                    kind: FailureKind::Timeout,
                    message: "operation timed out".to_string(),
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Op;

    fn task(operation: Op, arg1: f64, arg2: f64) -> Task {
        Task {
            id: 0,
            operation,
            arg1,
            arg2,
            timeout_ms: 50,
        }
    }

    #[tokio::test]
    async fn test_execute_with_deadline_success() {
        let result = execute_with_deadline(&task(Op::Mul, 6.0, 7.0)).await;
        assert_eq!(result.value, Some(42.0));
        assert!(result.error.is_none());
    }

    #[tokio::test]
    async fn test_execute_with_deadline_reports_operation_failure() {
        let result = execute_with_deadline(&task(Op::Div, 1.0, 0.0)).await;
        assert!(result.value.is_none());
        assert_eq!(result.error.unwrap().kind, FailureKind::Invalid);
    }
}
