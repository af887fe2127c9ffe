//! Two-operand integer calculator
//!
//! Evaluates `a op b` expressions for the shell's `calc` command with the
//! operators `+ - * /`, tolerating whitespace around numbers and operator
//! and a leading minus on either operand.

use std::fmt;

/// Calculator-local failures, rendered as text by the shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalcError {
    DivisionByZero,
    InvalidOperator(char),
    MissingExpression,
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalcError::DivisionByZero => write!(f, "Error: Division by zero"),
            CalcError::InvalidOperator(_) => {
                write!(f, "Invalid operator. Supported operators: +, -, *, /")
            }
            CalcError::MissingExpression => write!(f, "Usage: calc <a> <op> <b>"),
        }
    }
}

/// An evaluated expression, displayed as `a op b = result`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calculation {
    pub lhs: i64,
    pub op: char,
    pub rhs: i64,
    pub result: i64,
}

impl fmt::Display for Calculation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} = {}", self.lhs, self.op, self.rhs, self.result)
    }
}

/// Evaluate a two-operand expression
pub fn evaluate(expression: &str) -> Result<Calculation, CalcError> {
    let mut rest = expression;
    let lhs = parse_number(&mut rest).ok_or(CalcError::MissingExpression)?;
    let op = parse_operator(&mut rest).ok_or(CalcError::MissingExpression)?;
    let rhs = parse_number(&mut rest).ok_or(CalcError::MissingExpression)?;

    let result = match op {
        '+' => lhs.wrapping_add(rhs),
        '-' => lhs.wrapping_sub(rhs),
        '*' => lhs.wrapping_mul(rhs),
        '/' => {
            if rhs == 0 {
                return Err(CalcError::DivisionByZero);
            }
            lhs.wrapping_div(rhs)
        }
        other => return Err(CalcError::InvalidOperator(other)),
    };

    Ok(Calculation { lhs, op, rhs, result })
}

/// Consume whitespace, an optional minus sign, and a run of digits
fn parse_number(rest: &mut &str) -> Option<i64> {
    *rest = rest.trim_start();
    let negative = if let Some(tail) = rest.strip_prefix('-') {
        *rest = tail;
        true
    } else {
        false
    };

    let digits: usize = rest.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let value: i64 = rest[..digits].parse().ok()?;
    *rest = &rest[digits..];
    Some(if negative { -value } else { value })
}

/// Consume whitespace and one operator character
fn parse_operator(rest: &mut &str) -> Option<char> {
    *rest = rest.trim_start();
    let op = rest.chars().next()?;
    *rest = &rest[op.len_utf8()..];
    Some(op)
}
