//! calcd worker library.
//!
//! A stateless compute worker for the calcd orchestrator: it polls
//! `/internal/task` at a fixed interval, executes the primitive operation
//! under the task's timeout budget, and posts exactly one result back.

pub mod client;
pub mod config;
pub mod executor;
pub mod worker;

pub use config::WorkerConfig;
pub use worker::Worker;
