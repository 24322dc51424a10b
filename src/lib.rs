//! reqguard - schema-driven validation of inbound HTTP requests
//!
//! Each `FieldSchema` names one parameter, where it lives (query string or
//! body), its declared type, and optional pattern and bound constraints.
//! `validate` checks a request against an ordered list of schemas and
//! returns the first violation.
//!
//! ```ignore
//! use reqguard::{validate, FieldSchema, InboundRequest, Source};
//!
//! let schemas = [
//!     FieldSchema::required_string("name", Source::Query).with_max(10),
//!     FieldSchema::required_string("saviour", Source::Query).with_pattern("jesus"),
//! ];
//! let mut request = InboundRequest::get("/?name=martins&saviour=jesus".parse()?);
//! validate(&mut request, &schemas)?;
//! ```

pub mod config;
pub mod http;
pub mod request;
pub mod schema;

pub use config::{OptionalFieldPolicy, ValidatorConfig};
pub use request::{InboundRequest, RequestBody};
pub use schema::{
    validate, DataType, FieldSchema, RequestValidator, SchemaError, Source, ValidationError,
    ValidationErrorCode, ValidationOutcome,
};
