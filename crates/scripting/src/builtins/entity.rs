//! Functions over any entity reference

use super::any_arg;
use crate::error::{RegistryError, Result};
use crate::registry::{FunctionRegistration, FunctionRegistry};
use crate::types::VariableType;
use crate::value::Value;
use rust_decimal::Decimal;

const CATEGORY: &str = "entity";

pub fn register(registry: &mut FunctionRegistry) -> std::result::Result<(), RegistryError> {
    registry.register(
        FunctionRegistration::built_in("name", VariableType::TEXT, name)
            .parameter("entity", VariableType::REFERENCE, "")
            .in_category(CATEGORY)
            .with_help("Display name of any entity. Empty for a null reference."),
    )?;
    registry.register(
        FunctionRegistration::built_in("id", VariableType::NUMBER, id)
            .parameter("entity", VariableType::REFERENCE, "")
            .in_category(CATEGORY)
            .with_help("Identifier of any entity. 0 for a null reference."),
    )?;
    Ok(())
}

fn name(arguments: &[Value]) -> Result<Value> {
    let entity = any_arg("name", arguments, 0)?;
    let name = entity
        .as_entity()
        .and_then(|entity| entity.target())
        .map(|target| target.name().to_string())
        .unwrap_or_default();
    Ok(Value::Text(name))
}

fn id(arguments: &[Value]) -> Result<Value> {
    let entity = any_arg("id", arguments, 0)?;
    let id = entity
        .as_entity()
        .and_then(|entity| entity.id())
        .map(|id| Decimal::from(id.get()))
        .unwrap_or(Decimal::ZERO);
    Ok(Value::Number(id))
}
