//! Error types for the scripting crate
//!
//! Three families, one per phase: registration at start-up, compilation
//! (type checking) before a prog is ever run, and evaluation.

use crate::types::{TypeKind, VariableType};
use mudprog_core::MudError;

/// Start-up registration errors. These are bugs in a built-in or an entity
/// binding, never content errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    /// Two overloads of one function share an identical signature
    #[error("Function {name} is already registered with signature ({signature})")]
    DuplicateSignature { name: String, signature: String },

    /// An entity kind registered its dot-references twice
    #[error("Dot references for {0} are already registered")]
    DuplicateEntityType(TypeKind),

    /// A property appears twice in one entity type definition
    #[error("Property {property} is declared twice on {kind}")]
    DuplicateProperty { kind: TypeKind, property: String },

    /// Dot references can only be attached to entity kinds
    #[error("{0} is not an entity kind")]
    NotAnEntityKind(TypeKind),

    /// The registration itself is malformed
    #[error("Invalid registration for {name}: {message}")]
    InvalidRegistration { name: String, message: String },
}

/// Compile-time errors, raised before a tree is handed to the runtime
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    #[error("No overload of {name} accepts ({arguments})")]
    NoMatchingOverload { name: String, arguments: String },

    #[error("Call to {name} with ({arguments}) matches more than one overload")]
    AmbiguousOverload { name: String, arguments: String },

    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    #[error("Parameter {0} is declared more than once")]
    DuplicateParameter(String),

    #[error("{kind} has no property {property}")]
    UnknownProperty { kind: TypeKind, property: String },

    #[error("Cannot take property {property} of {target}")]
    NotAnEntity { target: VariableType, property: String },

    #[error("Operator {operator} cannot be applied to {operands}")]
    OperatorMismatch { operator: String, operands: String },

    #[error("Collection literal mixes {first} and {other}")]
    MixedCollection { first: VariableType, other: VariableType },

    #[error("Cannot infer the element type of an empty collection literal")]
    UntypedCollection,

    #[error("{0} cannot be a collection element type")]
    InvalidElementType(VariableType),

    #[error("Expected {expected} but the expression returns {found}")]
    ReturnTypeMismatch { expected: VariableType, found: VariableType },
}

/// Evaluation errors. These become `StatementResult::Error` at the prog boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    #[error("Variable not found: {0}")]
    UnknownVariable(String),

    #[error("{kind} has no registered property {property}")]
    UnknownProperty { kind: TypeKind, property: String },

    #[error("Entity binding for {kind}.{property} rejected the entity")]
    EntityBinding { kind: TypeKind, property: String },

    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: VariableType, found: VariableType },

    #[error("Invalid collection: {0}")]
    InvalidCollection(String),

    #[error("Evaluation exceeded the maximum depth of {0}")]
    DepthExceeded(usize),

    #[error("Built-in {function} failed: {message}")]
    BuiltIn { function: String, message: String },
}

impl From<RegistryError> for MudError {
    fn from(err: RegistryError) -> Self {
        MudError::Registry(err.to_string())
    }
}

impl From<CompileError> for MudError {
    fn from(err: CompileError) -> Self {
        MudError::Script(err.to_string())
    }
}

impl From<EvalError> for MudError {
    fn from(err: EvalError) -> Self {
        MudError::Script(err.to_string())
    }
}

/// Result type for evaluation
pub type Result<T> = std::result::Result<T, EvalError>;
