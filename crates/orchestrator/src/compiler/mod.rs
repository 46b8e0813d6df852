//! Expression compiler: validated infix → postfix (RPN) token sequences.
//!
//! The reduction pass is deliberately not textbook shunting-yard. When a new
//! operator binds no tighter than the operator on top of the stack, the top
//! operator is emitted and its stack slot is *replaced* by the new operator
//! instead of pushing a second entry. Same-precedence chains collapse eagerly,
//! which fixes evaluation order for the left-associative operators. The
//! evaluation driver depends on exactly this ordering.

pub mod token;

pub use token::{Op, Token};

use crate::error::EvalError;

/// Operator stack entry: either a pending operator or an open-paren marker.
#[derive(Debug, Clone, Copy)]
enum StackEntry {
    Op(Op),
    OpenParen,
}

/// Strip spaces and normalize the accepted input dialect:
/// `x`/`X` are multiplication, `,` is a decimal separator.
fn preprocess(expression: &str) -> String {
    expression
        .chars()
        .filter(|c| *c != ' ')
        .map(|c| match c {
            'x' | 'X' => '*',
            ',' => '.',
            other => other,
        })
        .collect()
}

/// Parse an accumulated numeric literal.
///
/// Overflowing literals parse to an infinity and are rejected as `Internal`:
/// a parse-time resource failure, not a syntax error.
fn parse_literal(raw: &str) -> Result<f64, EvalError> {
    let value: f64 = raw
        .parse()
        .map_err(|_| EvalError::Internal(format!("cannot parse numeric literal `{raw}`")))?;
    if !value.is_finite() {
        return Err(EvalError::Internal(format!(
            "numeric literal `{raw}` is out of range"
        )));
    }
    Ok(value)
}

/// Compile a raw infix expression into a postfix token sequence.
///
/// Validation and reduction happen in a single left-to-right scan; the
/// function fails fast and never returns a partially compiled sequence.
pub fn compile(expression: &str) -> Result<Vec<Token>, EvalError> {
    let src = preprocess(expression);
    if src.is_empty() {
        return Err(EvalError::Invalid("empty expression".to_string()));
    }

    let chars: Vec<char> = src.chars().collect();
    let mut output: Vec<Token> = Vec::new();
    let mut stack: Vec<StackEntry> = Vec::new();
    let mut literal = String::new();
    let mut open_parens: i32 = 0;
    let mut operator_count: usize = 0;
    let mut operand_count: usize = 0;
    let mut last_was_operator = false;

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_digit() && !matches!(c, '+' | '-' | '*' | '/' | '^' | '(' | ')' | '.') {
            return Err(EvalError::Invalid(format!(
                "unsupported character `{c}`: expressions may only contain numbers, \
                 `+ - * / ^` and parentheses"
            )));
        }

        // Accumulate digits; flush once the literal ends or input runs out.
        if c.is_ascii_digit() || c == '.' {
            last_was_operator = false;
            literal.push(c);
            if i + 1 < chars.len() {
                continue;
            }
        }

        if !literal.is_empty() {
            output.push(Token::Number(parse_literal(&literal)?));
            operand_count += 1;
            literal.clear();
        }

        if let Some(op) = Op::from_char(c) {
            // Parentheses do not reset adjacency: `5*(-2)` is two operators
            // in a row, just like the original dialect.
            if last_was_operator {
                return Err(EvalError::Invalid("two operators in a row".to_string()));
            }
            last_was_operator = true;
            if i == 0 || i == chars.len() - 1 {
                return Err(EvalError::Invalid(
                    "expression cannot start or end with an operator".to_string(),
                ));
            }
            match stack.last_mut() {
                Some(StackEntry::Op(top)) if op.precedence() <= top.precedence() => {
                    output.push(Token::Op(*top));
                    *top = op;
                }
                _ => stack.push(StackEntry::Op(op)),
            }
            operator_count += 1;
        } else if c == '(' {
            stack.push(StackEntry::OpenParen);
            open_parens += 1;
        } else if c == ')' {
            open_parens -= 1;
            if open_parens < 0 {
                return Err(EvalError::Invalid("unbalanced parentheses".to_string()));
            }
            while let Some(entry) = stack.pop() {
                match entry {
                    StackEntry::OpenParen => break,
                    StackEntry::Op(op) => output.push(Token::Op(op)),
                }
            }
        }
    }

    if operator_count >= operand_count {
        return Err(EvalError::Invalid(
            "operator count must be less than operand count".to_string(),
        ));
    }
    if open_parens != 0 {
        return Err(EvalError::Invalid("unclosed parentheses".to_string()));
    }

    // Drain pending operators top-to-bottom.
    while let Some(entry) = stack.pop() {
        if let StackEntry::Op(op) = entry {
            output.push(Token::Op(op));
        }
    }

    Ok(output)
}
