//! Compiled progs
//!
//! A [`Prog`] pairs a compiled node tree with its declared parameters and
//! return type. Executing it builds a fresh [`VariableSpace`], evaluates the
//! root and folds the outcome into an [`Evaluation`].

use crate::error::EvalError;
use crate::node::{NodeRef, StatementResult};
use crate::space::VariableSpace;
use crate::types::VariableType;
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// A declared input of a prog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgParameter {
    pub name: String,
    pub variable_type: VariableType,
}

impl ProgParameter {
    pub fn new(name: impl Into<String>, variable_type: VariableType) -> Self {
        Self {
            name: name.into(),
            variable_type,
        }
    }
}

/// Outcome of one execution
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// The result, or Void when `result` is Error
    pub value: Value,
    pub result: StatementResult,
    pub error: Option<EvalError>,
}

impl Evaluation {
    fn normal(value: Value) -> Self {
        Self {
            value,
            result: StatementResult::Normal,
            error: None,
        }
    }

    fn failed(error: EvalError) -> Self {
        Self {
            value: Value::Void,
            result: StatementResult::Error,
            error: Some(error),
        }
    }

    pub fn is_normal(&self) -> bool {
        self.result == StatementResult::Normal
    }

    pub fn into_result(self) -> Result<Value, EvalError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.value),
        }
    }
}

/// A type-checked, executable prog. Immutable; share it behind an `Arc`.
#[derive(Debug)]
pub struct Prog {
    name: String,
    return_type: VariableType,
    parameters: Vec<ProgParameter>,
    root: NodeRef,
    max_depth: usize,
}

impl Prog {
    pub(crate) fn new(
        name: String,
        return_type: VariableType,
        parameters: Vec<ProgParameter>,
        root: NodeRef,
        max_depth: usize,
    ) -> Self {
        Self {
            name,
            return_type,
            parameters,
            root,
            max_depth,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn return_type(&self) -> VariableType {
        self.return_type
    }

    pub fn parameters(&self) -> &[ProgParameter] {
        &self.parameters
    }

    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    /// Run the prog with the given parameter values
    pub fn execute<I, S>(&self, seeds: I) -> Evaluation
    where
        I: IntoIterator<Item = (S, Value)>,
        S: AsRef<str>,
    {
        let mut space = VariableSpace::with_max_depth(self.max_depth);
        for (name, value) in seeds {
            space.set(name.as_ref(), value);
        }

        for parameter in &self.parameters {
            match space.get(&parameter.name) {
                None => {
                    tracing::debug!(
                        target: "mudprog::degraded",
                        "Prog {} defaulted missing parameter {}",
                        self.name,
                        parameter.name
                    );
                    space.set(&parameter.name, Value::default_for(parameter.variable_type));
                }
                Some(value) if !value.variable_type().compatible_with(parameter.variable_type) => {
                    let found = value.variable_type();
                    tracing::error!(
                        "Prog {} parameter {} seeded with {} but declared {}",
                        self.name,
                        parameter.name,
                        found,
                        parameter.variable_type
                    );
                    return Evaluation::failed(EvalError::TypeMismatch {
                        expected: parameter.variable_type,
                        found,
                    });
                }
                Some(Value::Void) => {
                    space.set(&parameter.name, typed(Value::Void, parameter.variable_type));
                }
                Some(_) => {}
            }
        }

        match self.root.evaluate(&mut space) {
            Ok(value) if value.variable_type().compatible_with(self.return_type) => {
                Evaluation::normal(typed(value, self.return_type))
            }
            Ok(value) => {
                let found = value.variable_type();
                tracing::error!("Prog {} returned {} but is declared {}", self.name, found, self.return_type);
                Evaluation::failed(EvalError::TypeMismatch {
                    expected: self.return_type,
                    found,
                })
            }
            Err(error) => {
                tracing::warn!("Prog {} failed: {}", self.name, error);
                Evaluation::failed(error)
            }
        }
    }

    /// Run the prog, substituting `fallback` for an Error result
    pub fn execute_or<I, S>(&self, seeds: I, fallback: Value) -> Value
    where
        I: IntoIterator<Item = (S, Value)>,
        S: AsRef<str>,
    {
        let evaluation = self.execute(seeds);
        if evaluation.is_normal() {
            evaluation.value
        } else {
            fallback
        }
    }
}

/// Void standing in for an entity becomes a null reference of that kind
fn typed(value: Value, declared: VariableType) -> Value {
    match (value, declared) {
        (Value::Void, VariableType::Single(kind)) if kind.is_entity() => Value::null_entity(kind),
        (value, _) => value,
    }
}
