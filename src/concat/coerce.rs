//! Value conversion into a unified column type.
//!
//! | value \ target | Integer | Float    | Boolean  | String         |
//! |----------------|---------|----------|----------|----------------|
//! | Integer        | keep    | exact    | fail     | decimal text   |
//! | Float          | fail    | keep     | fail     | "5.0" style    |
//! | Boolean        | fail    | fail     | keep     | "true"/"false" |
//! | String         | parse   | parse    | parse    | keep           |
//!
//! Null converts to Null for every target. A `Null` target accepts only Null.
//! "exact" means integers beyond 2^53 in magnitude that have no identical
//! `f64` are rejected rather than rounded.

use crate::types::value::{parse_bool, parse_float};
use crate::types::{TypeTag, Value};

/// Converts `value` to `target`. On failure the value is handed back.
pub fn coerce(value: Value, target: TypeTag) -> Result<Value, Value> {
    match (value, target) {
        (Value::Null, _) => Ok(Value::Null),

        (v @ Value::Integer(_), TypeTag::Integer) => Ok(v),
        (Value::String(s), TypeTag::Integer) => match s.trim().parse::<i64>() {
            Ok(n) => Ok(Value::Integer(n)),
            Err(_) => Err(Value::String(s)),
        },

        (Value::Integer(n), TypeTag::Float) => match exact_float(n) {
            Some(f) => Ok(Value::Float(f)),
            None => Err(Value::Integer(n)),
        },
        (v @ Value::Float(_), TypeTag::Float) => Ok(v),
        (Value::String(s), TypeTag::Float) => match parse_float(s.trim()) {
            Some(f) => Ok(Value::Float(f)),
            None => Err(Value::String(s)),
        },

        (v @ Value::Boolean(_), TypeTag::Boolean) => Ok(v),
        (Value::String(s), TypeTag::Boolean) => match parse_bool(s.trim()) {
            Some(b) => Ok(Value::Boolean(b)),
            None => Err(Value::String(s)),
        },

        (v @ Value::String(_), TypeTag::String) => Ok(v),
        (other, TypeTag::String) => Ok(Value::String(other.to_string())),

        (other, _) => Err(other),
    }
}

fn exact_float(n: i64) -> Option<f64> {
    let f = n as f64;
    // i128 avoids the saturating cast hiding a rounded i64::MAX.
    (f as i128 == n as i128).then_some(f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_widen_to_float() {
        assert_eq!(coerce(Value::Integer(5), TypeTag::Float), Ok(Value::Float(5.0)));
        assert_eq!(
            coerce(Value::Integer(5), TypeTag::Float).unwrap().to_string(),
            "5.0"
        );
    }

    #[test]
    fn everything_renders_as_string() {
        assert_eq!(
            coerce(Value::Boolean(true), TypeTag::String),
            Ok(Value::String("true".into()))
        );
        assert_eq!(
            coerce(Value::Float(1.5), TypeTag::String),
            Ok(Value::String("1.5".into()))
        );
        assert_eq!(
            coerce(Value::Integer(-3), TypeTag::String),
            Ok(Value::String("-3".into()))
        );
    }

    #[test]
    fn text_is_parsed_for_typed_targets() {
        assert_eq!(coerce(Value::from(" 42 "), TypeTag::Integer), Ok(Value::Integer(42)));
        assert_eq!(coerce(Value::from("2.5"), TypeTag::Float), Ok(Value::Float(2.5)));
        assert_eq!(coerce(Value::from("FALSE"), TypeTag::Boolean), Ok(Value::Boolean(false)));
    }

    #[test]
    fn failures_hand_the_value_back() {
        assert_eq!(coerce(Value::from("abc"), TypeTag::Float), Err(Value::from("abc")));
        assert_eq!(coerce(Value::Float(1.5), TypeTag::Integer), Err(Value::Float(1.5)));
        assert_eq!(coerce(Value::Boolean(true), TypeTag::Integer), Err(Value::Boolean(true)));
        assert_eq!(coerce(Value::Integer(1), TypeTag::Null), Err(Value::Integer(1)));
    }

    #[test]
    fn integer_to_float_must_be_exact() {
        let limit = 1_i64 << 53;
        assert_eq!(coerce(Value::Integer(limit), TypeTag::Float), Ok(Value::Float(limit as f64)));
        assert_eq!(coerce(Value::Integer(-limit), TypeTag::Float), Ok(Value::Float(-limit as f64)));
        assert_eq!(
            coerce(Value::Integer(limit + 1), TypeTag::Float),
            Err(Value::Integer(limit + 1))
        );
        assert_eq!(
            coerce(Value::Integer(i64::MAX), TypeTag::Float),
            Err(Value::Integer(i64::MAX))
        );
        // Large powers of two are representable.
        assert_eq!(
            coerce(Value::Integer(i64::MIN), TypeTag::Float),
            Ok(Value::Float(i64::MIN as f64))
        );
    }

    #[test]
    fn null_passes_everywhere() {
        for target in [
            TypeTag::Null,
            TypeTag::Boolean,
            TypeTag::Integer,
            TypeTag::Float,
            TypeTag::String,
        ] {
            assert_eq!(coerce(Value::Null, target), Ok(Value::Null));
        }
    }
}
