//! Standard library
//!
//! Built-ins are grouped by category. Each group exposes a `register`
//! function; [`install`] applies all of them to a registry at start-up.

pub mod collection;
pub mod entity;
pub mod logic;
pub mod math;
pub mod text;

use crate::error::{EvalError, RegistryError, Result};
use crate::registry::FunctionRegistry;
use crate::types::VariableType;
use crate::value::{ProgCollection, Value};
use rust_decimal::Decimal;

/// Adds a group of functions to a registry
pub type FunctionRegistrar = fn(&mut FunctionRegistry) -> std::result::Result<(), RegistryError>;

/// Registrars making up the standard library
pub const STANDARD_LIBRARY: &[FunctionRegistrar] = &[
    text::register,
    math::register,
    logic::register,
    collection::register,
    entity::register,
];

/// Register the standard library
pub fn install(registry: &mut FunctionRegistry) -> std::result::Result<(), RegistryError> {
    for registrar in STANDARD_LIBRARY {
        registrar(registry)?;
    }
    tracing::info!("Installed {} standard library overloads", registry.len());
    Ok(())
}

fn argument<'a>(function: &str, arguments: &'a [Value], index: usize) -> Result<&'a Value> {
    arguments.get(index).ok_or_else(|| EvalError::BuiltIn {
        function: function.to_string(),
        message: format!("missing argument {}", index + 1),
    })
}

fn mismatch(function: &str, expected: VariableType, found: &Value) -> EvalError {
    tracing::error!("Built-in {} expected {} but received {}", function, expected, found.variable_type());
    EvalError::TypeMismatch {
        expected,
        found: found.variable_type(),
    }
}

pub(crate) fn text_arg<'a>(function: &str, arguments: &'a [Value], index: usize) -> Result<&'a str> {
    let value = argument(function, arguments, index)?;
    value.as_text().ok_or_else(|| mismatch(function, VariableType::TEXT, value))
}

pub(crate) fn number_arg(function: &str, arguments: &[Value], index: usize) -> Result<Decimal> {
    let value = argument(function, arguments, index)?;
    value.as_number().ok_or_else(|| mismatch(function, VariableType::NUMBER, value))
}

pub(crate) fn boolean_arg(function: &str, arguments: &[Value], index: usize) -> Result<bool> {
    let value = argument(function, arguments, index)?;
    value.as_bool().ok_or_else(|| mismatch(function, VariableType::BOOLEAN, value))
}

pub(crate) fn collection_arg<'a>(function: &str, arguments: &'a [Value], index: usize) -> Result<&'a ProgCollection> {
    let value = argument(function, arguments, index)?;
    value.as_collection().ok_or_else(|| {
        mismatch(
            function,
            VariableType::Collection(crate::types::TypeKind::Anything),
            value,
        )
    })
}

pub(crate) fn any_arg<'a>(function: &str, arguments: &'a [Value], index: usize) -> Result<&'a Value> {
    argument(function, arguments, index)
}
