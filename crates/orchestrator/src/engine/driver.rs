//! The evaluation driver: postfix walking with out-of-process arithmetic.

use std::sync::Arc;
use std::time::Duration;

use crate::compiler::{self, Op, Token};
use crate::config::OperatorTimeouts;
use crate::error::{EvalError, FailureKind};
use crate::queue::TaskQueue;
use crate::store::{ExpressionId, ExpressionStatus, ExpressionStore};

/// Extra wait on top of a task's budget before the driver gives up.
///
/// The worker enforces the budget on the computation itself; the grace covers
/// poll latency and the result round trip, so an explicit worker-side timeout
/// report reaches the driver instead of being raced by the driver's own timer.
const DISPATCH_GRACE: Duration = Duration::from_millis(250);

/// Walks the postfix sequence of one expression, dispatching each reducible
/// pair as a task and folding results back into its operand stack.
///
/// The driver owns every status transition of its expression: `Evaluating`
/// when it starts and exactly one terminal transition when it finishes.
pub struct Driver {
    queue: Arc<TaskQueue>,
    store: Arc<dyn ExpressionStore>,
    timeouts: OperatorTimeouts,
}

impl Driver {
    /// Create a driver service over the shared queue and store.
    pub fn new(
        queue: Arc<TaskQueue>,
        store: Arc<dyn ExpressionStore>,
        timeouts: OperatorTimeouts,
    ) -> Self {
        Self {
            queue,
            store,
            timeouts,
        }
    }

    /// Run the evaluation for one expression on a background task.
    pub fn spawn(self: &Arc<Self>, id: ExpressionId, raw: String) {
        let driver = Arc::clone(self);
        tokio::spawn(async move {
            driver.run(id, &raw).await;
        });
    }

    /// Compile and evaluate `raw`, persisting the lifecycle of expression `id`.
    pub async fn run(&self, id: ExpressionId, raw: &str) {
        let Some(mut record) = self.store.get(id) else {
            tracing::error!(expression_id = id, "Expression record not found, dropping evaluation");
            return;
        };

        record.status = ExpressionStatus::Evaluating;
        self.store.update(record.clone());

        let outcome = match compiler::compile(raw) {
            Ok(tokens) => self.evaluate(&tokens).await,
            Err(err) => Err(err),
        };

        match &outcome {
            Ok(value) => {
                tracing::info!(expression_id = id, value, "Expression evaluated");
            }
            Err(err) => {
                tracing::warn!(expression_id = id, error = %err, "Expression failed");
            }
        }

        record.finish(outcome);
        self.store.update(record);
    }

    /// Standard RPN evaluation, except every reduction is a task round trip.
    ///
    /// At most one task is outstanding at a time: each reduction depends on
    /// the previous result. The first failure or timeout aborts the whole
    /// expression; no partial result survives.
    pub async fn evaluate(&self, tokens: &[Token]) -> Result<f64, EvalError> {
        let mut stack: Vec<f64> = Vec::new();

        for token in tokens {
            match *token {
                Token::Number(value) => stack.push(value),
                Token::Op(op) => {
                    let rhs = stack
                        .pop()
                        .ok_or_else(|| EvalError::Internal("operand stack underflow".to_string()))?;
                    let lhs = stack
                        .pop()
                        .ok_or_else(|| EvalError::Internal("operand stack underflow".to_string()))?;
                    let value = self.solve(op, lhs, rhs).await?;
                    stack.push(value);
                }
            }
        }

        match stack.as_slice() {
            [value] => Ok(*value),
            _ => Err(EvalError::Internal(format!(
                "evaluation left {} operands on the stack",
                stack.len()
            ))),
        }
    }

    /// Dispatch one primitive operation and suspend until its result.
    async fn solve(&self, op: Op, lhs: f64, rhs: f64) -> Result<f64, EvalError> {
        let budget = self.timeouts.budget(op);
        let (task_id, rx) = self.queue.enqueue(op, lhs, rhs, budget);

        let result = match tokio::time::timeout(budget + DISPATCH_GRACE, rx).await {
            Err(_) => {
                tracing::warn!(task_id, operation = %op, "No task result within budget");
                return Err(EvalError::Timeout);
            }
            Ok(Err(_)) => {
                return Err(EvalError::Internal(
                    "task result channel closed".to_string(),
                ));
            }
            Ok(Ok(result)) => result,
        };

        match (result.value, result.error) {
            (Some(value), None) => Ok(value),
            (_, Some(error)) => Err(match error.kind {
                FailureKind::Invalid => EvalError::Invalid(error.message),
                FailureKind::Timeout => EvalError::Timeout,
                FailureKind::Internal => EvalError::Internal(error.message),
            }),
            (None, None) => Err(EvalError::Internal(
                "task result carried neither value nor error".to_string(),
            )),
        }
    }
}
