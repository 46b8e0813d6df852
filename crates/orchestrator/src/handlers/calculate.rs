//! Expression submission handler.

use axum::{extract::State, http::HeaderMap, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AppError;
use crate::handlers::owner_from_headers;
use crate::state::AppState;
use crate::store::ExpressionId;

/// Request to evaluate an expression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateRequest {
    /// Raw infix expression text.
    pub expression: String,
}

/// Response carrying the freshly allocated expression id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateResponse {
    /// Identifier to poll `/api/v1/expressions/{id}` with.
    pub id: ExpressionId,
}

/// Submit an expression for asynchronous evaluation.
///
/// `POST /api/v1/calculate`
///
/// Allocates an expression id, returns it immediately, and spawns an
/// evaluation driver. Compile or evaluation failures surface through the
/// expression record, never through this response.
pub async fn calculate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CalculateRequest>,
) -> Result<(StatusCode, Json<CalculateResponse>), AppError> {
    let owner = owner_from_headers(&headers);
    let record = state.store.create(&owner);

    info!(
        expression_id = record.id,
        expression = %request.expression,
        "Expression accepted"
    );

    state.driver.spawn(record.id, request.expression);

    Ok((StatusCode::CREATED, Json(CalculateResponse { id: record.id })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_deserialization() {
        let request: CalculateRequest =
            serde_json::from_str(r#"{"expression": "2+2*2"}"#).unwrap();
        assert_eq!(request.expression, "2+2*2");
    }

    #[test]
    fn test_response_serialization() {
        let response = CalculateResponse { id: 7 };
        assert_eq!(serde_json::to_string(&response).unwrap(), r#"{"id":7}"#);
    }
}
