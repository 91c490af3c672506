//! Text functions

use super::{any_arg, number_arg, text_arg};
use crate::error::{RegistryError, Result};
use crate::operators::degraded;
use crate::registry::{FunctionRegistration, FunctionRegistry};
use crate::types::VariableType;
use crate::value::Value;
use rust_decimal::prelude::ToPrimitive;

const CATEGORY: &str = "text";

pub fn register(registry: &mut FunctionRegistry) -> std::result::Result<(), RegistryError> {
    let text = VariableType::TEXT;
    let number = VariableType::NUMBER;

    registry.register(
        FunctionRegistration::built_in("concat", text, concat)
            .parameter("first", text, "Leading text")
            .parameter("second", text, "Trailing text")
            .in_category(CATEGORY)
            .with_help("Joins two texts together."),
    )?;
    registry.register(
        FunctionRegistration::built_in("substring", text, substring_from)
            .parameter("text", text, "Source text")
            .parameter("start", number, "Zero-based first character")
            .in_category(CATEGORY)
            .with_help("The text from start to the end. Empty when start is out of range."),
    )?;
    registry.register(
        FunctionRegistration::built_in("substring", text, substring_range)
            .parameter("text", text, "Source text")
            .parameter("start", number, "Zero-based first character")
            .parameter("length", number, "Number of characters")
            .in_category(CATEGORY)
            .with_help("Up to length characters from start. Empty when start is out of range."),
    )?;
    registry.register(
        FunctionRegistration::built_in("lower", text, lower)
            .parameter("text", text, "Source text")
            .in_category(CATEGORY)
            .with_help("The text in lower case."),
    )?;
    registry.register(
        FunctionRegistration::built_in("upper", text, upper)
            .parameter("text", text, "Source text")
            .in_category(CATEGORY)
            .with_help("The text in upper case."),
    )?;
    registry.register(
        FunctionRegistration::built_in("trim", text, trim)
            .parameter("text", text, "Source text")
            .in_category(CATEGORY)
            .with_help("The text without leading or trailing whitespace."),
    )?;
    registry.register(
        FunctionRegistration::built_in("length", number, length)
            .parameter("text", text, "Source text")
            .in_category(CATEGORY)
            .with_help("Number of characters in the text."),
    )?;
    registry.register(
        FunctionRegistration::built_in("startswith", VariableType::BOOLEAN, starts_with)
            .parameter("text", text, "Text to test")
            .parameter("prefix", text, "Expected prefix")
            .in_category(CATEGORY)
            .with_help("True if the text begins with the prefix."),
    )?;
    registry.register(
        FunctionRegistration::built_in("contains", VariableType::BOOLEAN, contains)
            .parameter("text", text, "Text to search")
            .parameter("fragment", text, "Text to look for")
            .in_category(CATEGORY)
            .with_help("True if the fragment occurs anywhere in the text."),
    )?;
    registry.register(
        FunctionRegistration::built_in("replace", text, replace)
            .parameter("text", text, "Source text")
            .parameter("find", text, "Text to replace")
            .parameter("with", text, "Replacement")
            .in_category(CATEGORY)
            .with_help("Replaces every occurrence of find. An empty find leaves the text unchanged."),
    )?;
    registry.register(
        FunctionRegistration::built_in("totext", text, to_text)
            .parameter("value", VariableType::ANYTHING, "Any value")
            .in_category(CATEGORY)
            .with_help("The value rendered as text. Entities render as their name."),
    )?;
    Ok(())
}

fn concat(arguments: &[Value]) -> Result<Value> {
    let mut joined = text_arg("concat", arguments, 0)?.to_string();
    joined.push_str(text_arg("concat", arguments, 1)?);
    Ok(Value::Text(joined))
}

/// Character index from a prog number; negative numbers have none
fn char_index(function: &str, arguments: &[Value], index: usize) -> Result<Option<usize>> {
    Ok(number_arg(function, arguments, index)?.trunc().to_usize())
}

fn substring(text: &str, start: Option<usize>, length: Option<usize>) -> Value {
    let count = text.chars().count();
    match start {
        Some(start) if start <= count => {
            Value::Text(text.chars().skip(start).take(length.unwrap_or(count)).collect())
        }
        _ => {
            degraded("substring", "start out of range");
            Value::Text(String::new())
        }
    }
}

fn substring_from(arguments: &[Value]) -> Result<Value> {
    let text = text_arg("substring", arguments, 0)?;
    let start = char_index("substring", arguments, 1)?;
    Ok(substring(text, start, None))
}

fn substring_range(arguments: &[Value]) -> Result<Value> {
    let text = text_arg("substring", arguments, 0)?;
    let start = char_index("substring", arguments, 1)?;
    match char_index("substring", arguments, 2)? {
        Some(length) => Ok(substring(text, start, Some(length))),
        None => {
            degraded("substring", "negative length");
            Ok(Value::Text(String::new()))
        }
    }
}

fn lower(arguments: &[Value]) -> Result<Value> {
    Ok(Value::Text(text_arg("lower", arguments, 0)?.to_lowercase()))
}

fn upper(arguments: &[Value]) -> Result<Value> {
    Ok(Value::Text(text_arg("upper", arguments, 0)?.to_uppercase()))
}

fn trim(arguments: &[Value]) -> Result<Value> {
    Ok(Value::text(text_arg("trim", arguments, 0)?.trim()))
}

fn length(arguments: &[Value]) -> Result<Value> {
    let count = text_arg("length", arguments, 0)?.chars().count();
    Ok(Value::Number(count.into()))
}

fn starts_with(arguments: &[Value]) -> Result<Value> {
    let text = text_arg("startswith", arguments, 0)?;
    let prefix = text_arg("startswith", arguments, 1)?;
    Ok(Value::Boolean(text.starts_with(prefix)))
}

fn contains(arguments: &[Value]) -> Result<Value> {
    let text = text_arg("contains", arguments, 0)?;
    let fragment = text_arg("contains", arguments, 1)?;
    Ok(Value::Boolean(text.contains(fragment)))
}

fn replace(arguments: &[Value]) -> Result<Value> {
    let text = text_arg("replace", arguments, 0)?;
    let find = text_arg("replace", arguments, 1)?;
    let with = text_arg("replace", arguments, 2)?;
    if find.is_empty() {
        return Ok(Value::text(text));
    }
    Ok(Value::Text(text.replace(find, with)))
}

fn to_text(arguments: &[Value]) -> Result<Value> {
    Ok(Value::Text(any_arg("totext", arguments, 0)?.display_text()))
}
