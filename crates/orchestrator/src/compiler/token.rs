//! Postfix token types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the five supported binary operators.
///
/// Serializes as its symbol so tasks carry `"+"`, `"-"`, `"*"`, `"/"`, `"^"`
/// on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Op {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
    #[serde(rename = "^")]
    Pow,
}

impl Op {
    /// Map an operator character to its variant.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Op::Add),
            '-' => Some(Op::Sub),
            '*' => Some(Op::Mul),
            '/' => Some(Op::Div),
            '^' => Some(Op::Pow),
            _ => None,
        }
    }

    /// The operator's symbol.
    pub fn as_char(self) -> char {
        match self {
            Op::Add => '+',
            Op::Sub => '-',
            Op::Mul => '*',
            Op::Div => '/',
            Op::Pow => '^',
        }
    }

    /// Binding strength used by the reduction pass.
    pub fn precedence(self) -> u8 {
        match self {
            Op::Pow => 3,
            Op::Mul | Op::Div => 2,
            Op::Add | Op::Sub => 1,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A single element of a compiled postfix sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    /// A numeric literal.
    Number(f64),
    /// A binary operator.
    Op(Op),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_op_round_trip() {
        for c in ['+', '-', '*', '/', '^'] {
            let op = Op::from_char(c).unwrap();
            assert_eq!(op.as_char(), c);
        }
        assert!(Op::from_char('%').is_none());
    }

    #[test]
    fn test_precedence_ordering() {
        assert!(Op::Pow.precedence() > Op::Mul.precedence());
        assert_eq!(Op::Mul.precedence(), Op::Div.precedence());
        assert!(Op::Mul.precedence() > Op::Add.precedence());
        assert_eq!(Op::Add.precedence(), Op::Sub.precedence());
    }

    #[test]
    fn test_op_serializes_as_symbol() {
        assert_eq!(serde_json::to_string(&Op::Pow).unwrap(), "\"^\"");
        let op: Op = serde_json::from_str("\"/\"").unwrap();
        assert_eq!(op, Op::Div);
    }
}
