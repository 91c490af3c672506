//! Untyped expression tree
//!
//! What a front end hands to the [`Compiler`](crate::compiler::Compiler).
//! Nothing here is type checked yet. Trees are serde-serializable so they
//! can be stored alongside content and reloaded without a parser.

use crate::operators::{BinaryOperator, UnaryOperator};
use crate::types::VariableType;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prog expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Number literal
    Number(Decimal),

    /// Text literal
    Text(String),

    /// Boolean literal
    Boolean(bool),

    /// The void literal
    Null,

    /// Parameter reference
    Variable(String),

    /// Binary operation
    Binary {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },

    /// Unary operation
    Unary {
        op: UnaryOperator,
        operand: Box<Expr>,
    },

    /// Built-in call
    Call {
        name: String,
        args: Vec<Expr>,
    },

    /// Property access (target.property)
    DotReference {
        target: Box<Expr>,
        property: String,
    },

    /// Collection literal. The element type is inferred from the items
    /// unless given.
    Collection {
        element: Option<VariableType>,
        items: Vec<Expr>,
    },
}

impl Expr {
    pub fn number(value: impl Into<Decimal>) -> Self {
        Expr::Number(value.into())
    }

    pub fn text(value: impl Into<String>) -> Self {
        Expr::Text(value.into())
    }

    pub fn boolean(value: bool) -> Self {
        Expr::Boolean(value)
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Expr::Variable(name.into())
    }

    pub fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Self {
        Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOperator, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            name: name.into(),
            args,
        }
    }

    /// `self.property`
    pub fn dot(self, property: impl Into<String>) -> Self {
        Expr::DotReference {
            target: Box::new(self),
            property: property.into(),
        }
    }

    pub fn collection(items: Vec<Expr>) -> Self {
        Expr::Collection { element: None, items }
    }

    pub fn typed_collection(element: VariableType, items: Vec<Expr>) -> Self {
        Expr::Collection {
            element: Some(element),
            items,
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", n.normalize()),
            Expr::Text(s) => write!(f, "{:?}", s),
            Expr::Boolean(b) => write!(f, "{}", b),
            Expr::Null => f.write_str("null"),
            Expr::Variable(name) => f.write_str(name),
            Expr::Binary { left, op, right } => write!(f, "({} {} {})", left, op, right),
            Expr::Unary { op: UnaryOperator::Not, operand } => write!(f, "not {}", operand),
            Expr::Unary { op, operand } => write!(f, "{}{}", op, operand),
            Expr::Call { name, args } => {
                write!(f, "{}(", name)?;
                write_list(f, args)?;
                f.write_str(")")
            }
            Expr::DotReference { target, property } => write!(f, "{}.{}", target, property),
            Expr::Collection { element, items } => {
                if let Some(element) = element {
                    write!(f, "<{}>", element)?;
                }
                f.write_str("[")?;
                write_list(f, items)?;
                f.write_str("]")
            }
        }
    }
}
