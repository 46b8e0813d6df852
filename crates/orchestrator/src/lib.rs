//! calcd orchestrator library.
//!
//! This crate hosts the control plane of the distributed calculator:
//!
//! - **Expression Compiler**: validated infix → postfix token sequences
//! - **Task Queue**: append-only ledger of primitive operations, exposed to
//!   workers via poll/submit
//! - **Evaluation Driver**: one RPN walk per in-flight expression, suspending
//!   on per-task result channels
//! - **HTTP API**: expression submission/query plus the internal worker
//!   endpoints
//!
//! ## Architecture
//!
//! Clients submit raw expressions and get an id back immediately; a spawned
//! driver compiles the expression and reduces it one binary operation at a
//! time. Every reducible pair becomes a task on the shared queue, where
//! stateless workers discover it by polling and post a result that is
//! correlated back to its driver strictly by task id.
//!
//! ## Modules
//!
//! - [`compiler`]: tokenization, validation and infix→postfix reduction
//! - [`config`]: configuration loading from environment variables
//! - [`engine`]: the evaluation driver
//! - [`error`]: domain taxonomy and Axum error integration
//! - [`handlers`]: HTTP route handlers
//! - [`queue`]: the shared task queue service
//! - [`state`]: shared application state
//! - [`store`]: expression records and the persistence boundary

pub mod compiler;
pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod queue;
pub mod state;
pub mod store;

pub use error::{AppError, AppResult, EvalError, FailureKind};
