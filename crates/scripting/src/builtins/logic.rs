//! Boolean helpers

use super::{any_arg, boolean_arg};
use crate::error::{RegistryError, Result};
use crate::registry::{FunctionRegistration, FunctionRegistry};
use crate::types::VariableType;
use crate::value::Value;

const CATEGORY: &str = "logic";

pub fn register(registry: &mut FunctionRegistry) -> std::result::Result<(), RegistryError> {
    registry.register(
        FunctionRegistration::built_in("not", VariableType::BOOLEAN, not)
            .parameter("value", VariableType::BOOLEAN, "")
            .in_category(CATEGORY)
            .with_help("Logical negation."),
    )?;
    registry.register(
        FunctionRegistration::built_in("isnull", VariableType::BOOLEAN, is_null)
            .parameter("value", VariableType::ANYTHING, "")
            .in_category(CATEGORY)
            .with_help("True for void values and references to nothing."),
    )?;
    Ok(())
}

fn not(arguments: &[Value]) -> Result<Value> {
    Ok(Value::Boolean(!boolean_arg("not", arguments, 0)?))
}

fn is_null(arguments: &[Value]) -> Result<Value> {
    Ok(Value::Boolean(any_arg("isnull", arguments, 0)?.is_null()))
}
