//! Prog operators
//!
//! Typing table and implementations for infix and prefix operators.
//! Operators degrade instead of failing on absent data: a void operand of a
//! concatenation reads as empty text, and division by zero yields zero.

use crate::error::{EvalError, Result};
use crate::node::{BinaryFn, BuiltInFn};
use crate::types::VariableType;
use crate::value::Value;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    // Arithmetic (Add doubles as text concatenation)
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,

    // Comparison
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,

    // Logical
    And,
    Or,

    // Text
    StartsWith,
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::Less => "<",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::Greater => ">",
            BinaryOperator::GreaterEqual => ">=",
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
            BinaryOperator::StartsWith => "startswith",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Prefix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOperator {
    Not,
    Negate,
}

impl UnaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOperator::Not => "not",
            UnaryOperator::Negate => "-",
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Result type and implementation of `lhs op rhs`, if the operand types allow it
pub fn resolve_binary(op: BinaryOperator, lhs: VariableType, rhs: VariableType) -> Option<(VariableType, BinaryFn)> {
    use BinaryOperator::*;

    let numbers = lhs == VariableType::NUMBER && rhs == VariableType::NUMBER;
    let texts = lhs == VariableType::TEXT && rhs == VariableType::TEXT;
    let booleans = lhs == VariableType::BOOLEAN && rhs == VariableType::BOOLEAN;

    let resolved: (VariableType, BinaryFn) = match op {
        Add if numbers => (VariableType::NUMBER, add),
        Add if concatenates(lhs, rhs) => (VariableType::TEXT, concatenate),
        Subtract if numbers => (VariableType::NUMBER, subtract),
        Multiply if numbers => (VariableType::NUMBER, multiply),
        Divide if numbers => (VariableType::NUMBER, divide),
        Modulo if numbers => (VariableType::NUMBER, modulo),
        Less if numbers || texts => (VariableType::BOOLEAN, less),
        LessEqual if numbers || texts => (VariableType::BOOLEAN, less_equal),
        Greater if numbers || texts => (VariableType::BOOLEAN, greater),
        GreaterEqual if numbers || texts => (VariableType::BOOLEAN, greater_equal),
        Equal if comparable(lhs, rhs) => (VariableType::BOOLEAN, equal),
        NotEqual if comparable(lhs, rhs) => (VariableType::BOOLEAN, not_equal),
        And if booleans => (VariableType::BOOLEAN, and),
        Or if booleans => (VariableType::BOOLEAN, or),
        StartsWith if texts => (VariableType::BOOLEAN, starts_with),
        _ => return None,
    };
    Some(resolved)
}

/// Result type and implementation of `op operand`
pub fn resolve_unary(op: UnaryOperator, operand: VariableType) -> Option<(VariableType, BuiltInFn)> {
    let resolved: (VariableType, BuiltInFn) = match op {
        UnaryOperator::Not if operand == VariableType::BOOLEAN => (VariableType::BOOLEAN, not),
        UnaryOperator::Negate if operand == VariableType::NUMBER => (VariableType::NUMBER, negate),
        _ => return None,
    };
    Some(resolved)
}

/// Text concatenation accepts text, numbers and void, with at least one text side
fn concatenates(lhs: VariableType, rhs: VariableType) -> bool {
    let textual = |ty: VariableType| {
        ty == VariableType::TEXT || ty == VariableType::NUMBER || ty == VariableType::VOID
    };
    textual(lhs) && textual(rhs) && (lhs == VariableType::TEXT || rhs == VariableType::TEXT)
}

fn comparable(lhs: VariableType, rhs: VariableType) -> bool {
    lhs.compatible_with(rhs) || rhs.compatible_with(lhs)
}

pub(crate) fn degraded(operation: &str, reason: &str) {
    tracing::debug!(target: "mudprog::degraded", "{}: {}", operation, reason);
}

fn number(value: &Value, operation: &str) -> Result<Decimal> {
    value.as_number().ok_or_else(|| {
        tracing::error!("Operator {} received {}", operation, value.variable_type());
        EvalError::TypeMismatch {
            expected: VariableType::NUMBER,
            found: value.variable_type(),
        }
    })
}

fn overflow(operation: &str) -> EvalError {
    EvalError::BuiltIn {
        function: operation.to_string(),
        message: "numeric overflow".into(),
    }
}

fn add(lhs: &Value, rhs: &Value) -> Result<Value> {
    let (a, b) = (number(lhs, "+")?, number(rhs, "+")?);
    a.checked_add(b).map(Value::Number).ok_or_else(|| overflow("+"))
}

fn subtract(lhs: &Value, rhs: &Value) -> Result<Value> {
    let (a, b) = (number(lhs, "-")?, number(rhs, "-")?);
    a.checked_sub(b).map(Value::Number).ok_or_else(|| overflow("-"))
}

fn multiply(lhs: &Value, rhs: &Value) -> Result<Value> {
    let (a, b) = (number(lhs, "*")?, number(rhs, "*")?);
    a.checked_mul(b).map(Value::Number).ok_or_else(|| overflow("*"))
}

fn divide(lhs: &Value, rhs: &Value) -> Result<Value> {
    let (a, b) = (number(lhs, "/")?, number(rhs, "/")?);
    if b.is_zero() {
        degraded("/", "division by zero");
        return Ok(Value::Number(Decimal::ZERO));
    }
    a.checked_div(b).map(Value::Number).ok_or_else(|| overflow("/"))
}

fn modulo(lhs: &Value, rhs: &Value) -> Result<Value> {
    let (a, b) = (number(lhs, "%")?, number(rhs, "%")?);
    if b.is_zero() {
        degraded("%", "modulo by zero");
        return Ok(Value::Number(Decimal::ZERO));
    }
    a.checked_rem(b).map(Value::Number).ok_or_else(|| overflow("%"))
}

fn concatenate(lhs: &Value, rhs: &Value) -> Result<Value> {
    if lhs.is_null() || rhs.is_null() {
        degraded("+", "void operand concatenated as empty text");
    }
    let mut text = lhs.display_text();
    text.push_str(&rhs.display_text());
    Ok(Value::Text(text))
}

fn ordering(lhs: &Value, rhs: &Value) -> Result<Ordering> {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => Ok(a.cmp(b)),
        (Value::Text(a), Value::Text(b)) => Ok(a.cmp(b)),
        _ => Err(EvalError::TypeMismatch {
            expected: lhs.variable_type(),
            found: rhs.variable_type(),
        }),
    }
}

fn less(lhs: &Value, rhs: &Value) -> Result<Value> {
    Ok(Value::Boolean(ordering(lhs, rhs)? == Ordering::Less))
}

fn less_equal(lhs: &Value, rhs: &Value) -> Result<Value> {
    Ok(Value::Boolean(ordering(lhs, rhs)? != Ordering::Greater))
}

fn greater(lhs: &Value, rhs: &Value) -> Result<Value> {
    Ok(Value::Boolean(ordering(lhs, rhs)? == Ordering::Greater))
}

fn greater_equal(lhs: &Value, rhs: &Value) -> Result<Value> {
    Ok(Value::Boolean(ordering(lhs, rhs)? != Ordering::Less))
}

/// Equality, with every null reference equal to every other
pub(crate) fn values_equal(lhs: &Value, rhs: &Value) -> bool {
    if lhs.is_null() || rhs.is_null() {
        return lhs.is_null() && rhs.is_null();
    }
    lhs == rhs
}

fn equal(lhs: &Value, rhs: &Value) -> Result<Value> {
    Ok(Value::Boolean(values_equal(lhs, rhs)))
}

fn not_equal(lhs: &Value, rhs: &Value) -> Result<Value> {
    Ok(Value::Boolean(!values_equal(lhs, rhs)))
}

fn boolean(value: &Value) -> bool {
    value.as_bool().unwrap_or(false)
}

fn and(lhs: &Value, rhs: &Value) -> Result<Value> {
    Ok(Value::Boolean(boolean(lhs) && boolean(rhs)))
}

fn or(lhs: &Value, rhs: &Value) -> Result<Value> {
    Ok(Value::Boolean(boolean(lhs) || boolean(rhs)))
}

fn starts_with(lhs: &Value, rhs: &Value) -> Result<Value> {
    let text = lhs.as_text().unwrap_or_default();
    let prefix = rhs.as_text().unwrap_or_default();
    Ok(Value::Boolean(text.starts_with(prefix)))
}

fn not(operands: &[Value]) -> Result<Value> {
    Ok(Value::Boolean(!operands.first().map(boolean).unwrap_or(false)))
}

fn negate(operands: &[Value]) -> Result<Value> {
    let operand = operands.first().map(|v| number(v, "-")).transpose()?.unwrap_or_default();
    Ok(Value::Number(-operand))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeKind;

    fn apply(op: BinaryOperator, lhs: Value, rhs: Value) -> Result<Value> {
        let (_, body) = resolve_binary(op, lhs.variable_type(), rhs.variable_type())
            .expect("operator should resolve");
        body(&lhs, &rhs)
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(apply(BinaryOperator::Add, Value::from(2), Value::from(3)), Ok(Value::from(5)));
        assert_eq!(apply(BinaryOperator::Subtract, Value::from(2), Value::from(3)), Ok(Value::from(-1)));
        assert_eq!(apply(BinaryOperator::Multiply, Value::from(4), Value::from(3)), Ok(Value::from(12)));
        assert_eq!(
            apply(BinaryOperator::Divide, Value::from(1), Value::from(4)),
            Ok(Value::Number(Decimal::new(25, 2)))
        );
        assert_eq!(apply(BinaryOperator::Modulo, Value::from(7), Value::from(4)), Ok(Value::from(3)));
    }

    #[test]
    fn test_division_by_zero_degrades() {
        assert_eq!(apply(BinaryOperator::Divide, Value::from(7), Value::from(0)), Ok(Value::from(0)));
        assert_eq!(apply(BinaryOperator::Modulo, Value::from(7), Value::from(0)), Ok(Value::from(0)));
    }

    #[test]
    fn test_overflow_is_error() {
        let result = apply(BinaryOperator::Multiply, Value::Number(Decimal::MAX), Value::from(2));
        assert!(matches!(result, Err(EvalError::BuiltIn { .. })));
    }

    #[test]
    fn test_concatenation() {
        assert_eq!(apply(BinaryOperator::Add, Value::text("foo"), Value::text("bar")), Ok(Value::text("foobar")));
        assert_eq!(apply(BinaryOperator::Add, Value::text("x"), Value::from(2)), Ok(Value::text("x2")));
        assert_eq!(apply(BinaryOperator::Add, Value::text("foo"), Value::Void), Ok(Value::text("foo")));
        assert!(resolve_binary(BinaryOperator::Add, VariableType::NUMBER, VariableType::VOID).is_none());
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(apply(BinaryOperator::Less, Value::from(1), Value::from(2)), Ok(Value::from(true)));
        assert_eq!(apply(BinaryOperator::GreaterEqual, Value::from(2), Value::from(2)), Ok(Value::from(true)));
        assert_eq!(apply(BinaryOperator::Greater, Value::text("a"), Value::text("b")), Ok(Value::from(false)));
        assert_eq!(apply(BinaryOperator::Equal, Value::text("a"), Value::text("a")), Ok(Value::from(true)));
        assert_eq!(apply(BinaryOperator::NotEqual, Value::from(1), Value::from(2)), Ok(Value::from(true)));
        assert!(resolve_binary(BinaryOperator::Less, VariableType::NUMBER, VariableType::TEXT).is_none());
        assert!(resolve_binary(BinaryOperator::Equal, VariableType::NUMBER, VariableType::TEXT).is_none());
    }

    #[test]
    fn test_null_references_compare_equal() {
        let shop = VariableType::of(TypeKind::Shop);
        let (_, eq) = resolve_binary(BinaryOperator::Equal, shop, VariableType::VOID).unwrap();
        assert_eq!(eq(&Value::null_entity(TypeKind::Shop), &Value::Void), Ok(Value::from(true)));
    }

    #[test]
    fn test_logic_and_text() {
        assert_eq!(apply(BinaryOperator::And, Value::from(true), Value::from(false)), Ok(Value::from(false)));
        assert_eq!(apply(BinaryOperator::Or, Value::from(true), Value::from(false)), Ok(Value::from(true)));
        assert_eq!(
            apply(BinaryOperator::StartsWith, Value::text("foobar"), Value::text("foo")),
            Ok(Value::from(true))
        );

        let (_, not_fn) = resolve_unary(UnaryOperator::Not, VariableType::BOOLEAN).unwrap();
        assert_eq!(not_fn(&[Value::from(true)]), Ok(Value::from(false)));
        let (_, negate_fn) = resolve_unary(UnaryOperator::Negate, VariableType::NUMBER).unwrap();
        assert_eq!(negate_fn(&[Value::from(4)]), Ok(Value::from(-4)));
        assert!(resolve_unary(UnaryOperator::Not, VariableType::NUMBER).is_none());
    }
}
