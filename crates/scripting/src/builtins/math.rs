//! Numeric functions

use super::{number_arg, text_arg};
use crate::error::{EvalError, RegistryError, Result};
use crate::operators::degraded;
use crate::registry::{FunctionRegistration, FunctionRegistry};
use crate::types::VariableType;
use crate::value::Value;
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use std::str::FromStr;

const CATEGORY: &str = "math";

/// Largest number of decimal places a number can carry
const MAX_PLACES: u32 = 28;

pub fn register(registry: &mut FunctionRegistry) -> std::result::Result<(), RegistryError> {
    let number = VariableType::NUMBER;

    let unary: [(&str, fn(&[Value]) -> Result<Value>, &str); 5] = [
        ("abs", abs, "The absolute value."),
        ("round", round, "Rounds to the nearest whole number, halves away from zero."),
        ("floor", floor, "The largest whole number not above the value."),
        ("ceiling", ceiling, "The smallest whole number not below the value."),
        ("sqrt", sqrt, "The square root. Negative values yield 0."),
    ];
    for (name, body, help) in unary {
        registry.register(
            FunctionRegistration::built_in(name, number, body)
                .parameter("value", number, "Input number")
                .in_category(CATEGORY)
                .with_help(help),
        )?;
    }

    registry.register(
        FunctionRegistration::built_in("min", number, min)
            .parameter("first", number, "")
            .parameter("second", number, "")
            .in_category(CATEGORY)
            .with_help("The smaller of two numbers."),
    )?;
    registry.register(
        FunctionRegistration::built_in("max", number, max)
            .parameter("first", number, "")
            .parameter("second", number, "")
            .in_category(CATEGORY)
            .with_help("The larger of two numbers."),
    )?;
    registry.register(
        FunctionRegistration::built_in("round", number, round_places)
            .parameter("value", number, "Input number")
            .parameter("places", number, "Decimal places to keep")
            .in_category(CATEGORY)
            .with_help("Rounds to a number of decimal places, halves away from zero."),
    )?;
    registry.register(
        FunctionRegistration::built_in("power", number, power)
            .parameter("base", number, "")
            .parameter("exponent", number, "")
            .in_category(CATEGORY)
            .with_help("Raises base to exponent. A negative base with a fractional exponent, or zero with a negative exponent, yields 0."),
    )?;
    registry.register(
        FunctionRegistration::built_in("tonumber", number, to_number)
            .parameter("text", VariableType::TEXT, "Text holding a number")
            .in_category(CATEGORY)
            .with_help("Parses a number. Unparsable text yields 0."),
    )?;
    registry.register(
        FunctionRegistration::built_in("random", number, random)
            .parameter("low", number, "Inclusive lower bound")
            .parameter("high", number, "Inclusive upper bound")
            .in_category(CATEGORY)
            .with_help("A random whole number between low and high inclusive."),
    )?;
    Ok(())
}

fn abs(arguments: &[Value]) -> Result<Value> {
    Ok(Value::Number(number_arg("abs", arguments, 0)?.abs()))
}

fn min(arguments: &[Value]) -> Result<Value> {
    let (a, b) = (number_arg("min", arguments, 0)?, number_arg("min", arguments, 1)?);
    Ok(Value::Number(a.min(b)))
}

fn max(arguments: &[Value]) -> Result<Value> {
    let (a, b) = (number_arg("max", arguments, 0)?, number_arg("max", arguments, 1)?);
    Ok(Value::Number(a.max(b)))
}

fn round(arguments: &[Value]) -> Result<Value> {
    let value = number_arg("round", arguments, 0)?;
    Ok(Value::Number(value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)))
}

fn round_places(arguments: &[Value]) -> Result<Value> {
    let value = number_arg("round", arguments, 0)?;
    let places = number_arg("round", arguments, 1)?
        .trunc()
        .to_u32()
        .unwrap_or(0)
        .min(MAX_PLACES);
    Ok(Value::Number(value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)))
}

fn floor(arguments: &[Value]) -> Result<Value> {
    Ok(Value::Number(number_arg("floor", arguments, 0)?.floor()))
}

fn ceiling(arguments: &[Value]) -> Result<Value> {
    Ok(Value::Number(number_arg("ceiling", arguments, 0)?.ceil()))
}

fn sqrt(arguments: &[Value]) -> Result<Value> {
    let value = number_arg("sqrt", arguments, 0)?;
    match value.sqrt() {
        Some(root) => Ok(Value::Number(root)),
        None => {
            degraded("sqrt", "square root of a negative number");
            Ok(Value::Number(Decimal::ZERO))
        }
    }
}

fn power(arguments: &[Value]) -> Result<Value> {
    let base = number_arg("power", arguments, 0)?;
    let exponent = number_arg("power", arguments, 1)?;

    if base.is_zero() && exponent.is_sign_negative() {
        degraded("power", "zero raised to a negative exponent");
        return Ok(Value::Number(Decimal::ZERO));
    }
    if exponent.fract().is_zero() {
        let whole = exponent.to_i64().ok_or_else(|| overflow("power"))?;
        return base.checked_powi(whole).map(Value::Number).ok_or_else(|| overflow("power"));
    }
    if base.is_sign_negative() {
        degraded("power", "negative base with a fractional exponent");
        return Ok(Value::Number(Decimal::ZERO));
    }

    let result = base.checked_powd(exponent).ok_or_else(|| overflow("power"))?;
    // powd collapses to zero instead of failing when the result is too large
    let grows = base != Decimal::ONE && (base > Decimal::ONE) == exponent.is_sign_positive();
    if grows && result <= Decimal::ONE {
        return Err(overflow("power"));
    }
    Ok(Value::Number(result))
}

fn to_number(arguments: &[Value]) -> Result<Value> {
    let text = text_arg("tonumber", arguments, 0)?.trim();
    let parsed = Decimal::from_str(text).or_else(|_| Decimal::from_scientific(text));
    match parsed {
        Ok(number) => Ok(Value::Number(number)),
        Err(_) => {
            degraded("tonumber", "text is not a number");
            Ok(Value::Number(Decimal::ZERO))
        }
    }
}

fn random(arguments: &[Value]) -> Result<Value> {
    let low = bound("random", number_arg("random", arguments, 0)?)?;
    let high = bound("random", number_arg("random", arguments, 1)?)?;
    let (low, high) = if low <= high { (low, high) } else { (high, low) };
    let rolled = rand::thread_rng().gen_range(low..=high);
    Ok(Value::Number(Decimal::from(rolled)))
}

fn bound(function: &str, value: Decimal) -> Result<i64> {
    value.trunc().to_i64().ok_or_else(|| overflow(function))
}

fn overflow(function: &str) -> EvalError {
    EvalError::BuiltIn {
        function: function.to_string(),
        message: "numeric overflow".into(),
    }
}

#[cfg(test)]
mod tests {
    use crate::builtins::tests::call;
    use crate::error::EvalError;
    use crate::value::Value;
    use rust_decimal::Decimal;

    fn decimal(text: &str) -> Value {
        Value::Number(text.parse().unwrap())
    }

    #[test]
    fn test_basic_math() {
        assert_eq!(call("abs", vec![Value::from(-3)]), Ok(Value::from(3)));
        assert_eq!(call("min", vec![Value::from(4), Value::from(-2)]), Ok(Value::from(-2)));
        assert_eq!(call("max", vec![Value::from(4), Value::from(-2)]), Ok(Value::from(4)));
        assert_eq!(call("floor", vec![decimal("2.7")]), Ok(Value::from(2)));
        assert_eq!(call("ceiling", vec![decimal("2.1")]), Ok(Value::from(3)));
    }

    #[test]
    fn test_rounding() {
        assert_eq!(call("round", vec![decimal("2.5")]), Ok(Value::from(3)));
        assert_eq!(call("round", vec![decimal("-2.5")]), Ok(Value::from(-3)));
        assert_eq!(call("round", vec![decimal("3.14159"), Value::from(2)]), Ok(decimal("3.14")));
    }

    #[test]
    fn test_sqrt() {
        let root = call("sqrt", vec![Value::from(16)]).unwrap().as_number().unwrap();
        assert!((root - Decimal::from(4)).abs() < Decimal::new(1, 20));
        assert_eq!(call("sqrt", vec![Value::from(-4)]), Ok(Value::from(0)));
    }

    #[test]
    fn test_power() {
        assert_eq!(call("power", vec![Value::from(2), Value::from(10)]), Ok(Value::from(1024)));
        assert_eq!(call("power", vec![Value::from(9), Value::from(2)]), Ok(Value::from(81)));
        assert!(matches!(
            call("power", vec![Value::from(10), Value::from(100)]),
            Err(EvalError::BuiltIn { .. })
        ));
    }

    #[test]
    fn test_power_fractional_exponent() {
        let root = call("power", vec![Value::from(9), decimal("0.5")]).unwrap().as_number().unwrap();
        assert!((root - Decimal::from(3)).abs() < Decimal::new(1, 10));
        let small = call("power", vec![decimal("1.5"), decimal("0.5")]).unwrap().as_number().unwrap();
        assert!(small > Decimal::ONE && small < Decimal::new(15, 1));

        assert_eq!(call("power", vec![Value::from(-8), decimal("0.5")]), Ok(Value::from(0)));
        assert!(matches!(
            call("power", vec![Value::from(2), decimal("1000.5")]),
            Err(EvalError::BuiltIn { .. })
        ));
        assert!(matches!(
            call("power", vec![Value::Number(Decimal::MAX), decimal("1.5")]),
            Err(EvalError::BuiltIn { .. })
        ));
    }

    #[test]
    fn test_power_of_zero_with_negative_exponent_degrades() {
        assert_eq!(call("power", vec![Value::from(0), decimal("-0.5")]), Ok(Value::from(0)));
        assert_eq!(call("power", vec![Value::from(0), Value::from(-1)]), Ok(Value::from(0)));
        assert_eq!(call("power", vec![Value::from(0), Value::from(0)]), Ok(Value::from(1)));
    }

    #[test]
    fn test_tonumber() {
        assert_eq!(call("tonumber", vec![Value::text(" 12.5 ")]), Ok(decimal("12.5")));
        assert_eq!(call("tonumber", vec![Value::text("twelve")]), Ok(Value::from(0)));
    }

    #[test]
    fn test_random_stays_in_bounds() {
        for _ in 0..50 {
            let rolled = call("random", vec![Value::from(1), Value::from(6)])
                .unwrap()
                .as_number()
                .unwrap();
            assert!(rolled >= Decimal::from(1) && rolled <= Decimal::from(6));
        }
        assert_eq!(call("random", vec![Value::from(5), Value::from(5)]), Ok(Value::from(5)));
        let swapped = call("random", vec![Value::from(3), Value::from(1)]).unwrap().as_number().unwrap();
        assert!(swapped >= Decimal::from(1) && swapped <= Decimal::from(3));
    }
}
