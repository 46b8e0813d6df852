//! Shared application state passed to all handlers via Axum.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::engine::Driver;
use crate::queue::TaskQueue;
use crate::store::ExpressionStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Expression persistence boundary.
    pub store: Arc<dyn ExpressionStore>,

    /// The shared task queue.
    pub queue: Arc<TaskQueue>,

    /// Evaluation driver service.
    pub driver: Arc<Driver>,

    /// Application configuration.
    pub config: Arc<AppConfig>,

    /// Server start time for uptime calculation.
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        store: Arc<dyn ExpressionStore>,
        queue: Arc<TaskQueue>,
        driver: Arc<Driver>,
        config: AppConfig,
    ) -> Self {
        Self {
            store,
            queue,
            driver,
            config: Arc::new(config),
            start_time: std::time::Instant::now(),
        }
    }

    /// Server uptime in seconds.
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
