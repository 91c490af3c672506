//! # MudProg Scripting Runtime
//!
//! The embedded expression language ("progs") builders use to attach
//! behaviour to game content.
//!
//! ## Features
//! - Static typing over primitives, entity references and collections
//! - Overloaded built-in functions resolved at compile time
//! - Dot references (`shop.owner.name`) typed from per-entity tables
//! - Expression trees shared freely between threads
//! - Generated documentation for every function and property
//!
//! ## Pipeline
//!
//! ### Start-up
//! - Registrars fill the [`FunctionRegistry`] and [`DotReferenceRegistry`]
//! - [`runtime::initialise`] freezes them for the life of the process
//!
//! ### Compile
//! - An untyped [`Expr`] is checked by the [`Compiler`] into a [`Prog`]
//!
//! ### Execute
//! - [`Prog::execute`] evaluates against a fresh [`VariableSpace`]
//! - Failures come back as [`StatementResult::Error`], never as panics

pub mod ast;
pub mod builtins;
pub mod compiler;
pub mod dot_reference;
pub mod entity;
pub mod error;
pub mod help;
pub mod node;
pub mod operators;
pub mod prog;
pub mod registry;
pub mod runtime;
pub mod space;
pub mod types;
pub mod value;

pub use ast::Expr;
pub use compiler::Compiler;
pub use dot_reference::{DotReferenceRegistry, EntityTypeBuilder, EntityTypeDefinition};
pub use entity::{EntityRef, ProgEntity};
pub use error::{CompileError, EvalError, RegistryError, Result};
pub use node::{ExpressionNode, NodeRef, StatementResult};
pub use operators::{BinaryOperator, UnaryOperator};
pub use prog::{Evaluation, Prog, ProgParameter};
pub use registry::{FunctionParameter, FunctionRegistration, FunctionRegistry};
pub use runtime::{ProgRuntime, ProgRuntimeBuilder};
pub use space::VariableSpace;
pub use types::{TypeKind, VariableType};
pub use value::{ProgCollection, Value};
