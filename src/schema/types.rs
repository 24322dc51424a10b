//! Field schema definitions
//!
//! Supported types:
//! - string: any raw text
//! - int: base-10 signed 64-bit integer
//! - bool: boolean literal
//! - float: 64-bit floating point
//!
//! A `FieldSchema` is built once by the caller and never mutated.

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::errors::{SchemaError, SchemaResult};

/// Bound value meaning "unconstrained" in the raw attribute form.
pub const UNBOUNDED: i64 = -1;

/// Declared type of a field's raw value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Base-10 signed 64-bit integer
    Int,
    /// Boolean literal
    Bool,
    /// 64-bit floating point
    Float,
    /// Any text
    String,
}

impl DataType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            DataType::Int => "int",
            DataType::Bool => "bool",
            DataType::Float => "float",
            DataType::String => "string",
        }
    }

    /// Whether min/max bounds are enforced for this type.
    ///
    /// Bounds on `float` and `bool` fields are accepted but inert.
    pub fn supports_bounds(&self) -> bool {
        matches!(self, DataType::Int | DataType::String)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

impl FromStr for DataType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "int" => Ok(DataType::Int),
            "bool" => Ok(DataType::Bool),
            "float" => Ok(DataType::Float),
            "string" => Ok(DataType::String),
            _ => Err(SchemaError::UnknownDataType(s.to_string())),
        }
    }
}

/// Where a field's value is carried in the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// URL query string
    Query,
    /// Request body (JSON or form encoded)
    Body,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Query => "query",
            Source::Body => "body",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "query" => Ok(Source::Query),
            "body" => Ok(Source::Body),
            _ => Err(SchemaError::UnknownSource(s.to_string())),
        }
    }
}

/// A pattern constraint, compiled once at schema construction.
///
/// A pattern that fails to compile is kept so that every check against it
/// fails closed instead of aborting schema construction.
#[derive(Debug, Clone)]
pub struct FieldPattern {
    source: String,
    compiled: Option<Regex>,
}

impl FieldPattern {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let compiled = match Regex::new(&source) {
            Ok(regex) => Some(regex),
            Err(err) => {
                tracing::warn!(pattern = %source, error = %err, "field pattern failed to compile");
                None
            }
        };
        Self { source, compiled }
    }

    /// The pattern as written by the caller
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The compiled expression, if compilation succeeded
    pub fn regex(&self) -> Option<&Regex> {
        self.compiled.as_ref()
    }

    pub fn is_valid(&self) -> bool {
        self.compiled.is_some()
    }
}

impl PartialEq for FieldPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for FieldPattern {}

/// Constraint set for a single request parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    field: String,
    required: bool,
    datatype: DataType,
    pattern: Option<FieldPattern>,
    min: Option<i64>,
    max: Option<i64>,
    source: Source,
}

impl FieldSchema {
    /// Create an optional, unbounded schema for `field`
    pub fn new(field: impl Into<String>, datatype: DataType, source: Source) -> Self {
        Self {
            field: field.into(),
            required: false,
            datatype,
            pattern: None,
            min: None,
            max: None,
            source,
        }
    }

    /// Create a required string field
    pub fn required_string(field: impl Into<String>, source: Source) -> Self {
        Self::new(field, DataType::String, source).required()
    }

    /// Create an optional string field
    pub fn optional_string(field: impl Into<String>, source: Source) -> Self {
        Self::new(field, DataType::String, source)
    }

    /// Create a required int field
    pub fn required_int(field: impl Into<String>, source: Source) -> Self {
        Self::new(field, DataType::Int, source).required()
    }

    /// Create an optional int field
    pub fn optional_int(field: impl Into<String>, source: Source) -> Self {
        Self::new(field, DataType::Int, source)
    }

    /// Create a required bool field
    pub fn required_bool(field: impl Into<String>, source: Source) -> Self {
        Self::new(field, DataType::Bool, source).required()
    }

    /// Create a required float field
    pub fn required_float(field: impl Into<String>, source: Source) -> Self {
        Self::new(field, DataType::Float, source).required()
    }

    /// Build a schema from its seven raw attributes.
    ///
    /// `datatype` and `source` are matched case-insensitively, an empty
    /// `pattern` means no pattern, and [`UNBOUNDED`] means no bound.
    pub fn from_parts(
        field: impl Into<String>,
        required: bool,
        datatype: &str,
        pattern: &str,
        min: i64,
        max: i64,
        source: &str,
    ) -> SchemaResult<Self> {
        let mut schema = Self::new(field, datatype.parse()?, source.parse()?);
        schema.required = required;
        if !pattern.is_empty() {
            schema.pattern = Some(FieldPattern::new(pattern));
        }
        schema.min = (min != UNBOUNDED).then_some(min);
        schema.max = (max != UNBOUNDED).then_some(max);
        schema.check_bounds()?;
        Ok(schema)
    }

    /// Mark the field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Require the raw value to contain a match for `pattern`
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(FieldPattern::new(pattern));
        self
    }

    /// Set the lower bound (length for strings, value for ints).
    ///
    /// Bounds are not cross-checked here; finish with [`FieldSchema::build`].
    pub fn with_min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    /// Set the upper bound (length for strings, value for ints).
    ///
    /// Bounds are not cross-checked here; finish with [`FieldSchema::build`].
    pub fn with_max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }

    /// Finishes a builder chain, rejecting inverted bounds.
    pub fn build(self) -> SchemaResult<Self> {
        self.check_bounds()?;
        Ok(self)
    }

    /// Rejects a schema whose lower bound exceeds its upper bound.
    pub fn check_bounds(&self) -> SchemaResult<()> {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min > max => Err(SchemaError::InvertedBounds {
                field: self.field.clone(),
                min,
                max,
            }),
            _ => Ok(()),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn datatype(&self) -> DataType {
        self.datatype
    }

    pub fn pattern(&self) -> Option<&FieldPattern> {
        self.pattern.as_ref()
    }

    pub fn min(&self) -> Option<i64> {
        self.min
    }

    pub fn max(&self) -> Option<i64> {
        self.max
    }

    pub fn source(&self) -> Source {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datatype_parse_is_case_insensitive() {
        assert_eq!("Float".parse::<DataType>().unwrap(), DataType::Float);
        assert_eq!("float".parse::<DataType>().unwrap(), DataType::Float);
        assert_eq!("String".parse::<DataType>().unwrap(), DataType::String);
        assert_eq!("INT".parse::<DataType>().unwrap(), DataType::Int);
        assert_eq!(" bool ".parse::<DataType>().unwrap(), DataType::Bool);
    }

    #[test]
    fn test_unknown_datatype_rejected() {
        let err = "decimal".parse::<DataType>().unwrap_err();
        assert!(matches!(err, SchemaError::UnknownDataType(ref t) if t == "decimal"));
    }

    #[test]
    fn test_source_parse() {
        assert_eq!("Query".parse::<Source>().unwrap(), Source::Query);
        assert_eq!("body".parse::<Source>().unwrap(), Source::Body);
        assert!("header".parse::<Source>().is_err());
    }

    #[test]
    fn test_from_parts_maps_sentinels() {
        let schema = FieldSchema::from_parts("name", true, "String", "", -1, 10, "query").unwrap();
        assert!(schema.is_required());
        assert_eq!(schema.datatype(), DataType::String);
        assert!(schema.pattern().is_none());
        assert_eq!(schema.min(), None);
        assert_eq!(schema.max(), Some(10));
        assert_eq!(schema.source(), Source::Query);
    }

    #[test]
    fn test_from_parts_keeps_pattern() {
        let schema = FieldSchema::from_parts("saviour", true, "string", "jesus", -1, -1, "body").unwrap();
        assert_eq!(schema.pattern().map(|p| p.as_str()), Some("jesus"));
        assert_eq!(schema.max(), None);
    }

    #[test]
    fn test_negative_bounds_other_than_sentinel_are_kept() {
        let schema = FieldSchema::from_parts("delta", false, "int", "", -50, -2, "query").unwrap();
        assert_eq!(schema.min(), Some(-50));
        assert_eq!(schema.max(), Some(-2));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let err = FieldSchema::from_parts("age", true, "int", "", 10, 5, "query").unwrap_err();
        assert!(matches!(err, SchemaError::InvertedBounds { min: 10, max: 5, .. }));
    }

    #[test]
    fn test_builder_bounds_checked_on_build() {
        let err = FieldSchema::required_int("age", Source::Query)
            .with_min(10)
            .with_max(5)
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvertedBounds { min: 10, max: 5, .. }));

        let schema = FieldSchema::required_int("age", Source::Query)
            .with_min(5)
            .with_max(5)
            .build()
            .unwrap();
        assert_eq!((schema.min(), schema.max()), (Some(5), Some(5)));
    }

    #[test]
    fn test_invalid_pattern_does_not_fail_construction() {
        let schema = FieldSchema::required_string("code", Source::Query).with_pattern("([a-z");
        let pattern = schema.pattern().unwrap();
        assert!(!pattern.is_valid());
        assert!(pattern.regex().is_none());
    }

    #[test]
    fn test_bounds_support_by_type() {
        assert!(DataType::Int.supports_bounds());
        assert!(DataType::String.supports_bounds());
        assert!(!DataType::Float.supports_bounds());
        assert!(!DataType::Bool.supports_bounds());
    }

    #[test]
    fn test_type_names() {
        assert_eq!(DataType::String.type_name(), "string");
        assert_eq!(DataType::Int.type_name(), "int");
        assert_eq!(DataType::Bool.type_name(), "bool");
        assert_eq!(DataType::Float.type_name(), "float");
    }
}
