//! Collection functions

use super::{any_arg, collection_arg, text_arg};
use crate::error::{EvalError, RegistryError, Result};
use crate::operators::{degraded, values_equal};
use crate::registry::{FunctionRegistration, FunctionRegistry};
use crate::types::{TypeKind, VariableType};
use crate::value::Value;
use rust_decimal::Decimal;

const CATEGORY: &str = "collection";

pub fn register(registry: &mut FunctionRegistry) -> std::result::Result<(), RegistryError> {
    let any_collection = VariableType::Collection(TypeKind::Anything);
    let numbers = VariableType::Collection(TypeKind::Number);

    registry.register(
        FunctionRegistration::built_in("count", VariableType::NUMBER, count)
            .parameter("collection", any_collection, "")
            .in_category(CATEGORY)
            .with_help("Number of elements in the collection."),
    )?;
    registry.register(
        FunctionRegistration::built_in("isempty", VariableType::BOOLEAN, is_empty)
            .parameter("collection", any_collection, "")
            .in_category(CATEGORY)
            .with_help("True when the collection has no elements."),
    )?;
    registry.register(
        FunctionRegistration::built_in("sum", VariableType::NUMBER, sum)
            .parameter("numbers", numbers, "")
            .in_category(CATEGORY)
            .with_help("Total of every element. An empty collection sums to 0."),
    )?;
    registry.register(
        FunctionRegistration::built_in("average", VariableType::NUMBER, average)
            .parameter("numbers", numbers, "")
            .in_category(CATEGORY)
            .with_help("Mean of every element. An empty collection averages to 0."),
    )?;
    registry.register(
        FunctionRegistration::built_in("join", VariableType::TEXT, join)
            .parameter("texts", VariableType::Collection(TypeKind::Text), "")
            .parameter("separator", VariableType::TEXT, "Placed between elements")
            .in_category(CATEGORY)
            .with_help("Joins the texts with a separator."),
    )?;
    registry.register(
        FunctionRegistration::built_in("contains", VariableType::BOOLEAN, contains)
            .parameter("collection", any_collection, "")
            .parameter("value", VariableType::ANYTHING, "Element to look for")
            .in_category(CATEGORY)
            .with_help("True when an element equals the value."),
    )?;
    Ok(())
}

fn count(arguments: &[Value]) -> Result<Value> {
    Ok(Value::Number(collection_arg("count", arguments, 0)?.len().into()))
}

fn is_empty(arguments: &[Value]) -> Result<Value> {
    Ok(Value::Boolean(collection_arg("isempty", arguments, 0)?.is_empty()))
}

fn total(function: &str, arguments: &[Value]) -> Result<(Decimal, usize)> {
    let collection = collection_arg(function, arguments, 0)?;
    let mut total = Decimal::ZERO;
    for item in collection.iter() {
        let number = item.as_number().ok_or_else(|| EvalError::TypeMismatch {
            expected: VariableType::NUMBER,
            found: item.variable_type(),
        })?;
        total = total.checked_add(number).ok_or_else(|| EvalError::BuiltIn {
            function: function.to_string(),
            message: "numeric overflow".into(),
        })?;
    }
    Ok((total, collection.len()))
}

fn sum(arguments: &[Value]) -> Result<Value> {
    let (total, _) = total("sum", arguments)?;
    Ok(Value::Number(total))
}

fn average(arguments: &[Value]) -> Result<Value> {
    let (total, len) = total("average", arguments)?;
    if len == 0 {
        degraded("average", "empty collection");
        return Ok(Value::Number(Decimal::ZERO));
    }
    Ok(Value::Number(total / Decimal::from(len)))
}

fn join(arguments: &[Value]) -> Result<Value> {
    let texts = collection_arg("join", arguments, 0)?;
    let separator = text_arg("join", arguments, 1)?;
    let parts: Vec<String> = texts.iter().map(Value::display_text).collect();
    Ok(Value::Text(parts.join(separator)))
}

fn contains(arguments: &[Value]) -> Result<Value> {
    let collection = collection_arg("contains", arguments, 0)?;
    let needle = any_arg("contains", arguments, 1)?;
    Ok(Value::Boolean(collection.iter().any(|item| values_equal(item, needle))))
}

#[cfg(test)]
mod tests {
    use crate::builtins::tests::call;
    use crate::types::TypeKind;
    use crate::value::{ProgCollection, Value};
    use rust_decimal::Decimal;

    fn numbers(values: &[i64]) -> Value {
        let items = values.iter().map(|n| Value::from(*n)).collect();
        Value::Collection(ProgCollection::from_values(TypeKind::Number, items).unwrap())
    }

    fn texts(values: &[&str]) -> Value {
        let items = values.iter().map(|t| Value::text(*t)).collect();
        Value::Collection(ProgCollection::from_values(TypeKind::Text, items).unwrap())
    }

    #[test]
    fn test_count_and_isempty() {
        assert_eq!(call("count", vec![numbers(&[1, 2, 3])]), Ok(Value::from(3)));
        assert_eq!(call("isempty", vec![texts(&[])]), Ok(Value::from(true)));
        assert_eq!(call("isempty", vec![texts(&["a"])]), Ok(Value::from(false)));
    }

    #[test]
    fn test_sum_and_average() {
        assert_eq!(call("sum", vec![numbers(&[1, 2, 3])]), Ok(Value::from(6)));
        assert_eq!(call("average", vec![numbers(&[1, 2])]), Ok(Value::Number(Decimal::new(15, 1))));
        assert_eq!(call("average", vec![numbers(&[])]), Ok(Value::from(0)));
    }

    #[test]
    fn test_join() {
        assert_eq!(
            call("join", vec![texts(&["red", "green", "blue"]), Value::text(" and ")]),
            Ok(Value::text("red and green and blue"))
        );
    }

    #[test]
    fn test_contains_resolves_by_argument_types() {
        assert_eq!(call("contains", vec![texts(&["a", "b"]), Value::text("b")]), Ok(Value::from(true)));
        assert_eq!(call("contains", vec![numbers(&[1, 2]), Value::from(7)]), Ok(Value::from(false)));
        // The text overload still wins for two texts
        assert_eq!(call("contains", vec![Value::text("abc"), Value::text("b")]), Ok(Value::from(true)));
    }
}
