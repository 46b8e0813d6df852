//! Error types for the calcd orchestrator.
//!
//! Two layers: [`EvalError`] is the domain taxonomy shared by the compiler,
//! the evaluation driver and the wire protocol; [`AppError`] wraps handler
//! failures and implements `IntoResponse` for Axum.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

/// Failure classification attached to expressions and task results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Malformed input, division by zero, unbalanced parentheses.
    Invalid,
    /// Numeric overflow at parse time, unexpected worker-side failure.
    Internal,
    /// No task result arrived within the timeout budget.
    Timeout,
}

/// Domain-level evaluation failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// User-correctable input error.
    #[error("expression is not valid: {0}")]
    Invalid(String),

    /// Unexpected orchestrator- or worker-side failure.
    #[error("internal evaluation error: {0}")]
    Internal(String),

    /// The operation did not produce a result within its budget.
    #[error("operation timed out")]
    Timeout,
}

impl EvalError {
    /// The failure classification for this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            EvalError::Invalid(_) => FailureKind::Invalid,
            EvalError::Internal(_) => FailureKind::Internal,
            EvalError::Timeout => FailureKind::Timeout,
        }
    }
}

/// Application-level errors for HTTP handlers.
#[derive(Error, Debug)]
pub enum AppError {
    /// Not found error
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Authorization error
    #[error("Authorization error: {0}")]
    Forbidden(String),

    /// Bad request error
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Evaluation timeout
    #[error("Evaluation timed out")]
    Timeout,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
            AppError::Config(msg) => {
                tracing::error!(error = %msg, "Configuration error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
            AppError::Timeout => (StatusCode::GATEWAY_TIMEOUT, self.to_string()),
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<EvalError> for AppError {
    fn from(err: EvalError) -> Self {
        match err {
            EvalError::Invalid(msg) => AppError::Validation(msg),
            EvalError::Internal(msg) => AppError::Internal(msg),
            EvalError::Timeout => AppError::Timeout,
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<envy::Error> for AppError {
    fn from(err: envy::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eval_error_kinds() {
        assert_eq!(
            EvalError::Invalid("8/0".into()).kind(),
            FailureKind::Invalid
        );
        assert_eq!(EvalError::Internal("boom".into()).kind(), FailureKind::Internal);
        assert_eq!(EvalError::Timeout.kind(), FailureKind::Timeout);
    }

    #[test]
    fn test_failure_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&FailureKind::Invalid).unwrap(),
            "\"invalid\""
        );
        assert_eq!(
            serde_json::to_string(&FailureKind::Timeout).unwrap(),
            "\"timeout\""
        );
    }

    #[test]
    fn test_eval_error_display() {
        let err = EvalError::Invalid("two operators in a row".to_string());
        assert_eq!(
            err.to_string(),
            "expression is not valid: two operators in a row"
        );
    }
}
