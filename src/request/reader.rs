//! Source Reader
//!
//! The single place where a field's raw value is located: query string,
//! JSON body, or form body. Every constraint check for one schema works
//! from the value resolved here; nothing is cached across schemas.

use serde_json::{Deserializer, Map, Value};
use url::form_urlencoded;

use super::{InboundRequest, FORM_CONTENT_TYPE, JSON_CONTENT_TYPE};
use crate::schema::{FieldSchema, Source, ValidationError};

/// How a field's value was carried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    /// URL query string
    Query,
    /// `application/json` body
    Json,
    /// Any other body, decoded as URL-encoded form data
    Form,
}

impl BodyEncoding {
    /// Picks the body encoding from a content type header.
    ///
    /// Only the media type essence is compared, so parameters such as
    /// `charset` are ignored. Anything that is not JSON is read as a form.
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        let essence = content_type
            .and_then(|value| value.split(';').next())
            .map(str::trim)
            .unwrap_or_default();

        if essence.eq_ignore_ascii_case(JSON_CONTENT_TYPE) {
            BodyEncoding::Json
        } else {
            BodyEncoding::Form
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BodyEncoding::Query => "query",
            BodyEncoding::Json => JSON_CONTENT_TYPE,
            BodyEncoding::Form => FORM_CONTENT_TYPE,
        }
    }
}

/// A located field value, before any type checking
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Key not present
    Absent,
    /// JSON `null`
    Null,
    /// Textual value (query, form, or JSON string)
    Text(String),
    /// JSON number
    Number(serde_json::Number),
    /// JSON boolean
    Bool(bool),
    /// JSON array or object
    Structured(&'static str),
}

impl FieldValue {
    fn from_json(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::String(text) => FieldValue::Text(text),
            Value::Number(number) => FieldValue::Number(number),
            Value::Bool(flag) => FieldValue::Bool(flag),
            Value::Array(_) => FieldValue::Structured("array"),
            Value::Object(_) => FieldValue::Structured("object"),
        }
    }

    /// JSON kind name for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Absent => "absent",
            FieldValue::Null => "null",
            FieldValue::Text(_) => "string",
            FieldValue::Number(_) => "number",
            FieldValue::Bool(_) => "boolean",
            FieldValue::Structured(kind) => *kind,
        }
    }
}

/// A field value together with the encoding it was read from
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedField {
    pub encoding: BodyEncoding,
    pub value: FieldValue,
}

impl ResolvedField {
    pub fn new(encoding: BodyEncoding, value: FieldValue) -> Self {
        Self { encoding, value }
    }

    /// Presence under the rules of the field's encoding.
    ///
    /// - query: the key exists, even with an empty value
    /// - JSON: the key exists and is not `null`
    /// - form: the value is non-empty
    pub fn is_present(&self) -> bool {
        match (&self.value, self.encoding) {
            (FieldValue::Absent, _) | (FieldValue::Null, _) => false,
            (FieldValue::Text(text), BodyEncoding::Form) => !text.is_empty(),
            _ => true,
        }
    }
}

/// Locates field values in a request
#[derive(Debug, Clone, Copy)]
pub struct SourceReader {
    max_body_bytes: usize,
}

impl SourceReader {
    pub fn new(max_body_bytes: usize) -> Self {
        Self { max_body_bytes }
    }

    /// Resolves the value of `schema`'s field from its declared source.
    ///
    /// # Errors
    ///
    /// Returns `MalformedBody` if the body cannot be buffered or a JSON
    /// body does not decode to an object.
    pub fn resolve(
        &self,
        schema: &FieldSchema,
        request: &mut InboundRequest,
    ) -> Result<ResolvedField, ValidationError> {
        match schema.source() {
            Source::Query => {
                let value = request
                    .query_first(schema.field())
                    .map_or(FieldValue::Absent, FieldValue::Text);
                Ok(ResolvedField::new(BodyEncoding::Query, value))
            }
            Source::Body => match request.body_encoding() {
                BodyEncoding::Json => self.resolve_json(schema.field(), request),
                _ => self.resolve_form(schema.field(), request),
            },
        }
    }

    fn resolve_json(
        &self,
        field: &str,
        request: &mut InboundRequest,
    ) -> Result<ResolvedField, ValidationError> {
        let body = request.buffered_body(self.max_body_bytes)?;

        // Only the first JSON value is decoded; anything after it is ignored.
        // A JSON request without a body carries no fields.
        let mut object = match Deserializer::from_slice(&body)
            .into_iter::<Map<String, Value>>()
            .next()
        {
            None => Map::new(),
            Some(decoded) => decoded
                .map_err(|err| ValidationError::malformed_body(format!("invalid JSON body: {}", err)))?,
        };

        let value = object
            .remove(field)
            .map_or(FieldValue::Absent, FieldValue::from_json);
        Ok(ResolvedField::new(BodyEncoding::Json, value))
    }

    fn resolve_form(
        &self,
        field: &str,
        request: &mut InboundRequest,
    ) -> Result<ResolvedField, ValidationError> {
        let body = request.buffered_body(self.max_body_bytes)?;

        // Body values take precedence over query values
        let value = form_urlencoded::parse(&body)
            .find(|(key, _)| key == field)
            .map(|(_, value)| value.into_owned())
            .or_else(|| request.query_first(field))
            .map_or(FieldValue::Absent, FieldValue::Text);
        Ok(ResolvedField::new(BodyEncoding::Form, value))
    }
}
