//! Expression query handlers.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::owner_from_headers;
use crate::state::AppState;
use crate::store::{ExpressionId, ExpressionRecord};

/// Envelope for the list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpressionsResponse {
    /// All expressions of the requesting owner, oldest first.
    pub expressions: Vec<ExpressionRecord>,
}

/// List the requesting owner's expressions.
///
/// `GET /api/v1/expressions`
pub async fn list_expressions(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<ExpressionsResponse>> {
    let owner = owner_from_headers(&headers);
    let expressions = state.store.list_for_owner(&owner);
    Ok(Json(ExpressionsResponse { expressions }))
}

/// Fetch one expression by id.
///
/// `GET /api/v1/expressions/{id}`
///
/// Returns the current record: a pending marker while evaluation runs, the
/// value once succeeded, or the failure kind once failed. The requesting
/// owner must match the record's owner.
pub async fn get_expression(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<ExpressionId>,
) -> AppResult<Json<ExpressionRecord>> {
    let owner = owner_from_headers(&headers);
    let record = state
        .store
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("expression {id} not found")))?;

    if record.owner != owner {
        return Err(AppError::Forbidden(
            "expression belongs to another owner".to_string(),
        ));
    }

    Ok(Json(record))
}
