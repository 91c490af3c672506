//! Variable space
//!
//! The flat, case-insensitive scope a single prog evaluation runs against.
//! One space per evaluation; spaces are never shared between evaluations.

use crate::error::{EvalError, Result};
use crate::value::Value;
use std::collections::HashMap;

/// Default bound on expression nesting during evaluation
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Named values visible to one evaluation
#[derive(Debug, Clone)]
pub struct VariableSpace {
    /// Values keyed by lowercased name
    variables: HashMap<String, Value>,

    /// Current evaluation depth
    depth: usize,

    /// Depth at which evaluation is abandoned
    max_depth: usize,
}

impl VariableSpace {
    /// Create a new empty space
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            variables: HashMap::new(),
            depth: 0,
            max_depth: max_depth.max(1),
        }
    }

    /// Create a space seeded with named parameters
    pub fn from_parameters<I, S>(parameters: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: AsRef<str>,
    {
        let mut space = Self::new();
        for (name, value) in parameters {
            space.set(name.as_ref(), value);
        }
        space
    }

    /// Get a variable
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(&name.to_lowercase())
    }

    /// Set a variable, returning the previous value
    pub fn set(&mut self, name: &str, value: Value) -> Option<Value> {
        self.variables.insert(name.to_lowercase(), value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(&name.to_lowercase())
    }

    /// Variable names, lowercased
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.variables.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Run `f` one level deeper, failing once the depth bound is reached
    pub fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= self.max_depth {
            return Err(EvalError::DepthExceeded(self.max_depth));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}

impl Default for VariableSpace {
    fn default() -> Self {
        Self::new()
    }
}
