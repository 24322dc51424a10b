//! Constraint checkers
//!
//! Presence, type, pattern and bound checks. Each works from the value the
//! Source Reader resolved for one schema and reports the first violation.

use super::errors::ValidationError;
use super::types::{DataType, FieldPattern, FieldSchema};
use crate::request::{FieldValue, ResolvedField};

/// Whether the field is present under its encoding's rules
pub fn check_presence(field: &ResolvedField) -> bool {
    field.is_present()
}

/// Extracts the raw text of a present field.
///
/// Only textual values are accepted. A JSON number, boolean, array or
/// object is rejected as a malformed body rather than coerced.
pub fn raw_value<'a>(schema: &FieldSchema, field: &'a ResolvedField) -> Result<&'a str, ValidationError> {
    match &field.value {
        FieldValue::Text(text) => Ok(text.as_str()),
        FieldValue::Absent | FieldValue::Null => Err(ValidationError::missing(schema.field())),
        other => Err(ValidationError::malformed_field(
            schema.field(),
            format!(
                "field '{}' must be sent as a JSON string, got {}",
                schema.field(),
                other.kind()
            ),
        )),
    }
}

/// Checks that the raw value parses as the declared type
pub fn check_type(schema: &FieldSchema, raw: &str) -> Result<(), ValidationError> {
    let well_typed = match schema.datatype() {
        DataType::Int => raw.parse::<i64>().is_ok(),
        DataType::Bool => parse_bool(raw).is_some(),
        DataType::Float => raw.parse::<f64>().is_ok(),
        DataType::String => true,
    };

    if well_typed {
        Ok(())
    } else {
        Err(ValidationError::type_mismatch(schema.field(), schema.datatype()))
    }
}

/// Checks that the pattern occurs somewhere in the raw value.
///
/// A pattern that failed to compile never matches.
pub fn check_pattern(schema: &FieldSchema, pattern: &FieldPattern, raw: &str) -> Result<(), ValidationError> {
    let matched = match pattern.regex() {
        Some(regex) => regex.is_match(raw),
        None => {
            tracing::warn!(
                field = schema.field(),
                pattern = pattern.as_str(),
                "rejecting value against uncompilable pattern"
            );
            false
        }
    };

    if matched {
        Ok(())
    } else {
        Err(ValidationError::pattern_mismatch(schema.field(), pattern.as_str()))
    }
}

/// Checks the lower bound: character length for strings, value for ints.
pub fn check_min(schema: &FieldSchema, min: i64, raw: &str) -> Result<(), ValidationError> {
    if !schema.datatype().supports_bounds() {
        return Ok(());
    }
    match measure(schema.datatype(), raw) {
        Some(measured) if measured >= min => Ok(()),
        _ => Err(ValidationError::below_minimum(schema.field(), min)),
    }
}

/// Checks the upper bound: character length for strings, value for ints.
pub fn check_max(schema: &FieldSchema, max: i64, raw: &str) -> Result<(), ValidationError> {
    if !schema.datatype().supports_bounds() {
        return Ok(());
    }
    match measure(schema.datatype(), raw) {
        Some(measured) if measured <= max => Ok(()),
        _ => Err(ValidationError::above_maximum(schema.field(), max)),
    }
}

/// The quantity a bound applies to
fn measure(datatype: DataType, raw: &str) -> Option<i64> {
    match datatype {
        DataType::String => i64::try_from(raw.chars().count()).ok(),
        DataType::Int => raw.parse::<i64>().ok(),
        DataType::Bool | DataType::Float => None,
    }
}

/// Parses a boolean literal.
///
/// Accepts `true`/`false`/`t`/`f` in any case, and `1`/`0`.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" => Some(true),
        "0" => Some(false),
        _ if raw.eq_ignore_ascii_case("true") || raw.eq_ignore_ascii_case("t") => Some(true),
        _ if raw.eq_ignore_ascii_case("false") || raw.eq_ignore_ascii_case("f") => Some(false),
        _ => None,
    }
}
