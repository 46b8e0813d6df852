//! Orchestrator HTTP client and the wire types it speaks.

use anyhow::Result;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One of the five supported binary operators, wire-encoded as its symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
    #[serde(rename = "^")]
    Pow,
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            Op::Add => '+',
            Op::Sub => '-',
            Op::Mul => '*',
            Op::Div => '/',
            Op::Pow => '^',
        };
        write!(f, "{symbol}")
    }
}

/// Failure classification understood by the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Invalid,
    Internal,
    Timeout,
}

/// A primitive operation fetched from the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Ledger-wide unique task id.
    pub id: u64,
    /// The operator to apply.
    pub operation: Op,
    /// Left operand.
    pub arg1: f64,
    /// Right operand.
    pub arg2: f64,
    /// Compute deadline in milliseconds.
    pub timeout_ms: u64,
}

/// Structured failure for one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskError {
    pub kind: FailureKind,
    pub message: String,
}

/// Outcome of executing one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResult {
    pub id: u64,
    pub value: Option<f64>,
    pub error: Option<TaskError>,
}

/// HTTP client for the orchestrator's internal task API.
#[derive(Clone)]
pub struct OrchestratorClient {
    client: reqwest::Client,
    server_url: String,
}

impl OrchestratorClient {
    /// Create a new orchestrator client.
    pub fn new(server_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            client,
            server_url: server_url.trim_end_matches('/').to_string(),
        }
    }

    /// Poll for the oldest unresolved task.
    ///
    /// Returns `None` when the queue has nothing pending (204).
    pub async fn poll_task(&self) -> Result<Option<Task>> {
        let response = self
            .client
            .get(format!("{}/internal/task", self.server_url))
            .send()
            .await?;

        match response.status() {
            StatusCode::NO_CONTENT => Ok(None),
            status if status.is_success() => {
                let task: Task = response.json().await?;
                Ok(Some(task))
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                anyhow::bail!("Failed to poll task: status {status}: {body}");
            }
        }
    }

    /// Report the result for one task.
    ///
    /// A lost first-result-wins race is acknowledged as a no-op by the
    /// orchestrator, so success here only means the result was delivered.
    pub async fn submit_result(&self, result: &TaskResult) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/internal/task", self.server_url))
            .json(result)
            .send()
            .await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Failed to submit result: {body}");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_deserialization() {
        let json = serde_json::json!({
            "id": 7,
            "operation": "/",
            "arg1": 8.0,
            "arg2": 2.0,
            "timeout_ms": 50
        });

        let task: Task = serde_json::from_value(json).unwrap();
        assert_eq!(task.id, 7);
        assert_eq!(task.operation, Op::Div);
        assert_eq!(task.timeout_ms, 50);
    }

    #[test]
    fn test_result_serialization() {
        let result = TaskResult {
            id: 7,
            value: None,
            error: Some(TaskError {
                kind: FailureKind::Invalid,
                message: "division by zero".to_string(),
            }),
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["error"]["kind"], "invalid");
        assert_eq!(json["value"], serde_json::Value::Null);
    }

    #[test]
    fn test_client_strips_trailing_slash() {
        let client = OrchestratorClient::new("http://localhost:8080/");
        assert_eq!(client.server_url, "http://localhost:8080");
    }
}
