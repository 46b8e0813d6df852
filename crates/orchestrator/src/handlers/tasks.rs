//! Internal task endpoints: the only interface between orchestrator and
//! worker processes.

use axum::{extract::State, http::StatusCode, Json};
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::queue::{SubmitOutcome, Task, TaskResult};
use crate::state::AppState;

/// Hand out the oldest unresolved task, if any.
///
/// `GET /internal/task`
///
/// `200` with the task, or `204 No Content` when nothing is pending. The
/// task is not removed: workers may observe it again until a result lands.
pub async fn poll_task(State(state): State<AppState>) -> Result<Json<Task>, StatusCode> {
    match state.queue.poll_next() {
        Some(task) => {
            debug!(task_id = task.id, operation = %task.operation, "Task handed to worker");
            Ok(Json(task))
        }
        None => Err(StatusCode::NO_CONTENT),
    }
}

/// Record a worker's result for a task.
///
/// `POST /internal/task`
///
/// First result wins; duplicates are acknowledged as no-ops so a slow worker
/// never sees an error for a race it lost. Unknown task ids are rejected.
pub async fn submit_result(
    State(state): State<AppState>,
    Json(result): Json<TaskResult>,
) -> AppResult<StatusCode> {
    let task_id = result.id;
    match state.queue.submit(result) {
        SubmitOutcome::Recorded => {
            debug!(task_id, "Task result recorded");
            Ok(StatusCode::OK)
        }
        SubmitOutcome::Duplicate => {
            debug!(task_id, "Duplicate task result ignored");
            Ok(StatusCode::OK)
        }
        SubmitOutcome::UnknownTask => Err(AppError::NotFound(format!(
            "task {task_id} was never issued"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use crate::queue::{Task, TaskResult};
    use crate::compiler::Op;

    #[test]
    fn test_task_wire_shape() {
        let task = Task {
            id: 3,
            operation: Op::Mul,
            arg1: 2.0,
            arg2: 5.0,
            timeout_ms: 50,
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["operation"], "*");
        assert_eq!(json["timeout_ms"], 50);
    }

    #[test]
    fn test_result_wire_shape() {
        let result: TaskResult = serde_json::from_value(serde_json::json!({
            "id": 3,
            "value": 10.0,
            "error": null
        }))
        .unwrap();
        assert_eq!(result.id, 3);
        assert_eq!(result.value, Some(10.0));
        assert!(result.error.is_none());

        let failed: TaskResult = serde_json::from_value(serde_json::json!({
            "id": 4,
            "value": null,
            "error": {"kind": "invalid", "message": "division by zero"}
        }))
        .unwrap();
        assert_eq!(
            failed.error.unwrap().kind,
            crate::error::FailureKind::Invalid
        );
    }
}
