//! Worker configuration.

use anyhow::Result;
use std::time::Duration;

/// Worker pool configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Orchestrator server URL.
    pub server_url: String,

    /// Delay between polls of the task endpoint.
    pub poll_interval: Duration,

    /// Number of independent polling loops to run.
    pub computing_power: usize,
}

impl WorkerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let server_url = std::env::var("CALCD_SERVER_URL")
            .unwrap_or_else(|_| "http://localhost:8080".to_string());

        let poll_interval_ms: u64 = std::env::var("CALCD_POLL_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        let computing_power: usize = std::env::var("CALCD_COMPUTING_POWER")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(4);

        Ok(Self {
            server_url,
            poll_interval: Duration::from_millis(poll_interval_ms),
            computing_power,
        })
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8080".to_string(),
            poll_interval: Duration::from_millis(10),
            computing_power: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = WorkerConfig::default();
        assert_eq!(config.server_url, "http://localhost:8080");
        assert_eq!(config.poll_interval, Duration::from_millis(10));
        assert_eq!(config.computing_power, 4);
    }
}
