//! Configuration loading from environment variables.

pub mod app;
pub mod timeouts;

pub use app::AppConfig;
pub use timeouts::OperatorTimeouts;
