//! HTTP client for the orchestrator's internal task endpoints.

pub mod orchestrator;

pub use orchestrator::{FailureKind, Op, OrchestratorClient, Task, TaskError, TaskResult};
