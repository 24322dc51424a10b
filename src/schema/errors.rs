//! Validation outcome and schema construction errors
//!
//! Error codes:
//! - REQ_MISSING_FIELD
//! - REQ_TYPE_MISMATCH
//! - REQ_PATTERN_MISMATCH
//! - REQ_BELOW_MINIMUM
//! - REQ_ABOVE_MAXIMUM
//! - REQ_MALFORMED_BODY

use std::fmt;

use thiserror::Error;

use super::types::DataType;

/// Machine-readable code for a failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorCode {
    /// Required field absent from its source
    MissingRequiredField,
    /// Raw value does not parse as the declared type
    TypeMismatch,
    /// Raw value does not contain a match for the pattern
    PatternMismatch,
    /// Length or value under the configured minimum
    BelowMinimum,
    /// Length or value over the configured maximum
    AboveMaximum,
    /// Body could not be read or decoded, or a JSON value has the wrong shape
    MalformedBody,
}

impl ValidationErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            ValidationErrorCode::MissingRequiredField => "REQ_MISSING_FIELD",
            ValidationErrorCode::TypeMismatch => "REQ_TYPE_MISMATCH",
            ValidationErrorCode::PatternMismatch => "REQ_PATTERN_MISMATCH",
            ValidationErrorCode::BelowMinimum => "REQ_BELOW_MINIMUM",
            ValidationErrorCode::AboveMaximum => "REQ_ABOVE_MAXIMUM",
            ValidationErrorCode::MalformedBody => "REQ_MALFORMED_BODY",
        }
    }
}

impl fmt::Display for ValidationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Reason a request failed validation.
///
/// Only the first failing schema/check is ever reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is a required field")]
    MissingRequiredField { field: String },

    #[error("{field} must be of type {expected}")]
    TypeMismatch { field: String, expected: DataType },

    #[error("{field} does not match required pattern")]
    PatternMismatch { field: String, pattern: String },

    #[error("the minimum accepted length/value for {field} is {min}")]
    BelowMinimum { field: String, min: i64 },

    #[error("the maximum accepted length/value for {field} is {max}")]
    AboveMaximum { field: String, max: i64 },

    #[error("malformed request body: {reason}")]
    MalformedBody {
        field: Option<String>,
        reason: String,
    },
}

impl ValidationError {
    pub fn missing(field: impl Into<String>) -> Self {
        ValidationError::MissingRequiredField { field: field.into() }
    }

    pub fn type_mismatch(field: impl Into<String>, expected: DataType) -> Self {
        ValidationError::TypeMismatch {
            field: field.into(),
            expected,
        }
    }

    pub fn pattern_mismatch(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        ValidationError::PatternMismatch {
            field: field.into(),
            pattern: pattern.into(),
        }
    }

    pub fn below_minimum(field: impl Into<String>, min: i64) -> Self {
        ValidationError::BelowMinimum {
            field: field.into(),
            min,
        }
    }

    pub fn above_maximum(field: impl Into<String>, max: i64) -> Self {
        ValidationError::AboveMaximum {
            field: field.into(),
            max,
        }
    }

    /// Body-level failure not tied to a single field
    pub fn malformed_body(reason: impl Into<String>) -> Self {
        ValidationError::MalformedBody {
            field: None,
            reason: reason.into(),
        }
    }

    /// A body field whose JSON value has the wrong shape
    pub fn malformed_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::MalformedBody {
            field: Some(field.into()),
            reason: reason.into(),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> ValidationErrorCode {
        match self {
            ValidationError::MissingRequiredField { .. } => ValidationErrorCode::MissingRequiredField,
            ValidationError::TypeMismatch { .. } => ValidationErrorCode::TypeMismatch,
            ValidationError::PatternMismatch { .. } => ValidationErrorCode::PatternMismatch,
            ValidationError::BelowMinimum { .. } => ValidationErrorCode::BelowMinimum,
            ValidationError::AboveMaximum { .. } => ValidationErrorCode::AboveMaximum,
            ValidationError::MalformedBody { .. } => ValidationErrorCode::MalformedBody,
        }
    }

    /// Returns the field that failed, if the failure is tied to one
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::MissingRequiredField { field }
            | ValidationError::TypeMismatch { field, .. }
            | ValidationError::PatternMismatch { field, .. }
            | ValidationError::BelowMinimum { field, .. }
            | ValidationError::AboveMaximum { field, .. } => Some(field.as_str()),
            ValidationError::MalformedBody { field, .. } => field.as_deref(),
        }
    }
}

/// Result of validating one request against a schema list
pub type ValidationOutcome = Result<(), ValidationError>;

/// Errors raised while building a `FieldSchema`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("unknown datatype '{0}' (expected int, bool, float or string)")]
    UnknownDataType(String),

    #[error("unknown source '{0}' (expected query or body)")]
    UnknownSource(String),

    #[error("minimum {min} exceeds maximum {max} for field '{field}'")]
    InvertedBounds { field: String, min: i64, max: i64 },
}

/// Result type for schema construction
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ValidationErrorCode::MissingRequiredField.code(), "REQ_MISSING_FIELD");
        assert_eq!(ValidationErrorCode::TypeMismatch.code(), "REQ_TYPE_MISMATCH");
        assert_eq!(ValidationErrorCode::PatternMismatch.code(), "REQ_PATTERN_MISMATCH");
        assert_eq!(ValidationErrorCode::BelowMinimum.code(), "REQ_BELOW_MINIMUM");
        assert_eq!(ValidationErrorCode::AboveMaximum.code(), "REQ_ABOVE_MAXIMUM");
        assert_eq!(ValidationErrorCode::MalformedBody.code(), "REQ_MALFORMED_BODY");
    }

    #[test]
    fn test_messages() {
        assert_eq!(ValidationError::missing("name").to_string(), "name is a required field");
        assert_eq!(
            ValidationError::type_mismatch("age", DataType::Int).to_string(),
            "age must be of type int"
        );
        assert_eq!(
            ValidationError::pattern_mismatch("saviour", "jesus").to_string(),
            "saviour does not match required pattern"
        );
        assert_eq!(
            ValidationError::below_minimum("name", 4).to_string(),
            "the minimum accepted length/value for name is 4"
        );
        assert_eq!(
            ValidationError::above_maximum("name", 10).to_string(),
            "the maximum accepted length/value for name is 10"
        );
    }

    #[test]
    fn test_field_accessor() {
        assert_eq!(ValidationError::below_minimum("age", 1).field(), Some("age"));
        assert_eq!(ValidationError::malformed_body("not json").field(), None);
        assert_eq!(
            ValidationError::malformed_field("count", "expected a JSON string").field(),
            Some("count")
        );
    }

    #[test]
    fn test_code_matches_variant() {
        let err = ValidationError::malformed_body("truncated");
        assert_eq!(err.code(), ValidationErrorCode::MalformedBody);
        assert!(err.to_string().contains("truncated"));
    }
}
