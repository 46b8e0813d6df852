//! Per-operator timeout budgets.
//!
//! Each of the five primitive operations carries its own duration budget,
//! modeling heterogeneous cost in the worker pool. Budgets are the unit both
//! the evaluation driver and the workers honor.

use std::time::Duration;

use serde::Deserialize;

use crate::compiler::Op;

const DEFAULT_BUDGET_MS: u64 = 50;

/// Timeout budgets in milliseconds, one per operator.
///
/// Loaded from unprefixed environment variables, all defaulting to 50ms:
/// `TIME_ADDITION_MS`, `TIME_SUBTRACTION_MS`, `TIME_MULTIPLICATIONS_MS`,
/// `TIME_DIVISIONS_MS`, `TIME_POW_MS`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OperatorTimeouts {
    /// Budget for `+`.
    #[serde(default = "default_budget_ms")]
    pub time_addition_ms: u64,

    /// Budget for `-`.
    #[serde(default = "default_budget_ms")]
    pub time_subtraction_ms: u64,

    /// Budget for `*`.
    #[serde(default = "default_budget_ms")]
    pub time_multiplications_ms: u64,

    /// Budget for `/`.
    #[serde(default = "default_budget_ms")]
    pub time_divisions_ms: u64,

    /// Budget for `^`.
    #[serde(default = "default_budget_ms")]
    pub time_pow_ms: u64,
}

fn default_budget_ms() -> u64 {
    DEFAULT_BUDGET_MS
}

impl OperatorTimeouts {
    /// Load budgets from environment variables.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env::<OperatorTimeouts>()
    }

    /// The timeout budget for one operator.
    pub fn budget(&self, op: Op) -> Duration {
        let ms = match op {
            Op::Add => self.time_addition_ms,
            Op::Sub => self.time_subtraction_ms,
            Op::Mul => self.time_multiplications_ms,
            Op::Div => self.time_divisions_ms,
            Op::Pow => self.time_pow_ms,
        };
        Duration::from_millis(ms)
    }

    /// Uniform budgets, mostly for tests.
    pub fn uniform(ms: u64) -> Self {
        Self {
            time_addition_ms: ms,
            time_subtraction_ms: ms,
            time_multiplications_ms: ms,
            time_divisions_ms: ms,
            time_pow_ms: ms,
        }
    }
}

impl Default for OperatorTimeouts {
    fn default() -> Self {
        Self::uniform(DEFAULT_BUDGET_MS)
    }
}
