//! Primitive operation execution.

use crate::client::{FailureKind, Op, TaskError};

/// Apply one binary operation to two operands.
///
/// Division by zero is a user-correctable failure and reported as `Invalid`,
/// matching the orchestrator's error taxonomy.
pub fn execute(operation: Op, arg1: f64, arg2: f64) -> Result<f64, TaskError> {
    match operation {
        Op::Add => Ok(arg1 + arg2),
        Op::Sub => Ok(arg1 - arg2),
        Op::Mul => Ok(arg1 * arg2),
        Op::Div => {
            if arg2 == 0.0 {
                return Err(TaskError {
                    kind: FailureKind::Invalid,
                    message: "division by zero".to_string(),
                });
            }
            Ok(arg1 / arg2)
        }
        Op::Pow => Ok(arg1.powf(arg2)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        assert_eq!(execute(Op::Add, 5.0, 3.0).unwrap(), 8.0);
        assert_eq!(execute(Op::Sub, 5.0, 3.0).unwrap(), 2.0);
        assert_eq!(execute(Op::Mul, 5.0, 3.0).unwrap(), 15.0);
        assert_eq!(execute(Op::Div, 8.0, 2.0).unwrap(), 4.0);
        assert_eq!(execute(Op::Pow, 5.0, 3.0).unwrap(), 125.0);
    }

    #[test]
    fn test_division_by_zero() {
        let err = execute(Op::Div, 8.0, 0.0).unwrap_err();
        assert_eq!(err.kind, FailureKind::Invalid);
        assert_eq!(err.message, "division by zero");
    }

    #[test]
    fn test_fractional_pow() {
        let value = execute(Op::Pow, 8.0, 1.0 / 3.0).unwrap();
        assert!((value - 2.0).abs() < 1e-9);
    }
}
