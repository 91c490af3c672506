//! Function registry
//!
//! Maps a function name to its overloads. An overload is keyed by its full
//! parameter type list, so arity is part of the signature. Resolution picks
//! an exact signature match first, then the single overload whose parameters
//! all accept the argument types.

use crate::error::{CompileError, RegistryError};
use crate::node::{BuiltInFn, BuiltInNode, NodeRef};
use crate::types::{describe_signature, VariableType};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// Builds the node for one call site from its compiled arguments
pub type NodeFactory = Arc<dyn Fn(Vec<NodeRef>) -> NodeRef + Send + Sync>;

/// Category used when a registration does not name one
pub const DEFAULT_CATEGORY: &str = "general";

/// One declared parameter of a function
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionParameter {
    pub name: String,
    pub variable_type: VariableType,
    pub help: String,
}

/// A single overload
#[derive(Clone)]
pub struct FunctionRegistration {
    name: String,
    parameters: Vec<FunctionParameter>,
    return_type: VariableType,
    category: String,
    help: String,
    factory: NodeFactory,
}

impl FunctionRegistration {
    /// An overload whose nodes come from a custom factory
    pub fn new<F>(name: impl Into<String>, return_type: VariableType, factory: F) -> Self
    where
        F: Fn(Vec<NodeRef>) -> NodeRef + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            return_type,
            category: DEFAULT_CATEGORY.to_string(),
            help: String::new(),
            factory: Arc::new(factory),
        }
    }

    /// An overload evaluated by a [`BuiltInNode`] running `body`
    pub fn built_in(name: impl Into<String>, return_type: VariableType, body: BuiltInFn) -> Self {
        let name = name.into();
        let node_name = name.clone();
        Self::new(name, return_type, move |children| {
            Box::new(BuiltInNode::new(node_name.clone(), return_type, children, body))
        })
    }

    /// Append a parameter
    pub fn parameter(mut self, name: impl Into<String>, variable_type: VariableType, help: impl Into<String>) -> Self {
        self.parameters.push(FunctionParameter {
            name: name.into(),
            variable_type,
            help: help.into(),
        });
        self
    }

    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &[FunctionParameter] {
        &self.parameters
    }

    pub fn return_type(&self) -> VariableType {
        self.return_type
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    /// Ordered parameter types
    pub fn signature(&self) -> Vec<VariableType> {
        self.parameters.iter().map(|p| p.variable_type).collect()
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    /// Instantiate the node for a call with these arguments
    pub fn build_node(&self, arguments: Vec<NodeRef>) -> NodeRef {
        (self.factory)(arguments)
    }

    fn matches_exactly(&self, arguments: &[VariableType]) -> bool {
        self.parameters.len() == arguments.len()
            && self
                .parameters
                .iter()
                .zip(arguments)
                .all(|(parameter, argument)| parameter.variable_type == *argument)
    }

    fn accepts(&self, arguments: &[VariableType]) -> bool {
        self.parameters.len() == arguments.len()
            && self
                .parameters
                .iter()
                .zip(arguments)
                .all(|(parameter, argument)| argument.compatible_with(parameter.variable_type))
    }
}

impl fmt::Debug for FunctionRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}) -> {}", self.name, describe_signature(&self.signature()), self.return_type)
    }
}

/// All registered built-ins. Populated at start-up, read-only after.
#[derive(Debug, Default)]
pub struct FunctionRegistry {
    /// Overloads keyed by lowercased name
    functions: HashMap<String, Vec<FunctionRegistration>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an overload. An identical signature under the same name is rejected.
    pub fn register(&mut self, registration: FunctionRegistration) -> Result<(), RegistryError> {
        if registration.name.trim().is_empty() {
            return Err(RegistryError::InvalidRegistration {
                name: registration.name,
                message: "function name is empty".into(),
            });
        }
        if registration.return_type.is_error() || registration.signature().iter().any(|ty| ty.is_error()) {
            return Err(RegistryError::InvalidRegistration {
                name: registration.name,
                message: "Error is not a declarable type".into(),
            });
        }

        let overloads = self.functions.entry(registration.name.to_lowercase()).or_default();
        let signature = registration.signature();
        if overloads.iter().any(|existing| existing.signature() == signature) {
            return Err(RegistryError::DuplicateSignature {
                name: registration.name,
                signature: describe_signature(&signature),
            });
        }

        tracing::debug!("Registered function {:?}", registration);
        overloads.push(registration);
        Ok(())
    }

    /// Pick the overload of `name` for these argument types
    pub fn resolve(&self, name: &str, arguments: &[VariableType]) -> Result<&FunctionRegistration, CompileError> {
        let overloads = self
            .functions
            .get(&name.to_lowercase())
            .ok_or_else(|| CompileError::UnknownFunction(name.to_string()))?;

        if let Some(exact) = overloads.iter().find(|overload| overload.matches_exactly(arguments)) {
            return Ok(exact);
        }

        let mut candidates = overloads.iter().filter(|overload| overload.accepts(arguments));
        match (candidates.next(), candidates.next()) {
            (Some(found), None) => Ok(found),
            (Some(_), Some(_)) => Err(CompileError::AmbiguousOverload {
                name: name.to_string(),
                arguments: describe_signature(arguments),
            }),
            (None, _) => Err(CompileError::NoMatchingOverload {
                name: name.to_string(),
                arguments: describe_signature(arguments),
            }),
        }
    }

    /// Every overload registered under `name`
    pub fn overloads(&self, name: &str) -> &[FunctionRegistration] {
        self.functions
            .get(&name.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(&name.to_lowercase())
    }

    /// Overloads grouped by category, each group sorted by name then arity
    pub fn list_by_category(&self) -> BTreeMap<&str, Vec<&FunctionRegistration>> {
        let mut categories: BTreeMap<&str, Vec<&FunctionRegistration>> = BTreeMap::new();
        for registration in self.functions.values().flatten() {
            categories.entry(registration.category()).or_default().push(registration);
        }
        for group in categories.values_mut() {
            group.sort_by(|a, b| {
                a.name
                    .to_lowercase()
                    .cmp(&b.name.to_lowercase())
                    .then(a.arity().cmp(&b.arity()))
                    .then_with(|| a.signature().cmp(&b.signature()))
            });
        }
        categories
    }

    /// Number of registered overloads
    pub fn len(&self) -> usize {
        self.functions.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
