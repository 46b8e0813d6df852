//! HTTP handlers for the calcd orchestrator API.
//!
//! This module contains all route handlers organized by domain.

pub mod calculate;
pub mod expressions;
pub mod health;
pub mod tasks;

pub use calculate::calculate;
pub use expressions::{get_expression, list_expressions};
pub use health::{api_health, health_check};
pub use tasks::{poll_task, submit_result};

use axum::http::HeaderMap;

/// Opaque owner identity attached to every expression.
///
/// Authentication is an external collaborator; the orchestrator only carries
/// the identity through and compares it on query.
pub const OWNER_HEADER: &str = "x-owner-id";

/// Default identity when the caller sends no `X-Owner-Id` header.
pub const ANONYMOUS_OWNER: &str = "anonymous";

/// Extract the owner identity from request headers.
pub fn owner_from_headers(headers: &HeaderMap) -> String {
    headers
        .get(OWNER_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .unwrap_or(ANONYMOUS_OWNER)
        .to_string()
}
