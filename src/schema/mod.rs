//! Field schemas and the validation engine
//!
//! A validation call takes an ordered list of `FieldSchema` values and a
//! request, and reports either success or the first violation found.
//!
//! # Principles
//!
//! - Schemas are immutable once built
//! - Evaluation is ordered and fail-fast
//! - Only the first violation is reported
//! - Validation never panics on malformed input; it fails the request

pub mod checks;
mod errors;
mod types;
mod validator;

pub use errors::{SchemaError, SchemaResult, ValidationError, ValidationErrorCode, ValidationOutcome};
pub use types::{DataType, FieldPattern, FieldSchema, Source, UNBOUNDED};
pub use validator::{validate, RequestValidator};
