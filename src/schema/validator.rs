//! Request validator
//!
//! Evaluation order, per schema and in the order given:
//! 1. presence (required fields must be present)
//! 2. type
//! 3. pattern, when set
//! 4. minimum, when set and the type supports bounds
//! 5. maximum, when set and the type supports bounds
//!
//! The first failure ends validation. An absent optional field is handled
//! according to the configured `OptionalFieldPolicy`.

use super::checks;
use super::errors::{ValidationError, ValidationOutcome};
use super::types::FieldSchema;
use crate::config::{OptionalFieldPolicy, ValidatorConfig};
use crate::request::{InboundRequest, SourceReader};

/// Result of evaluating a single schema that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    /// Move on to the next schema
    Continue,
    /// Accept the request without evaluating the remaining schemas
    AcceptRequest,
}

/// Validates inbound requests against ordered field schemas.
///
/// Holds no per-request state; one validator can serve any number of
/// concurrent calls.
#[derive(Debug, Clone, Default)]
pub struct RequestValidator {
    config: ValidatorConfig,
}

impl RequestValidator {
    /// Creates a validator with the given configuration.
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validates `request` against `schemas`.
    ///
    /// The request body is buffered on first read and left readable, so
    /// the caller (or a second validation) can still consume it.
    ///
    /// # Errors
    ///
    /// Returns the first failing check as a `ValidationError`.
    pub fn validate(&self, request: &mut InboundRequest, schemas: &[FieldSchema]) -> ValidationOutcome {
        let reader = SourceReader::new(self.config.max_body_bytes);

        for schema in schemas {
            match self.evaluate(&reader, request, schema) {
                Ok(Verdict::Continue) => {}
                Ok(Verdict::AcceptRequest) => {
                    tracing::trace!(
                        field = schema.field(),
                        "optional field absent, accepting request without further checks"
                    );
                    return Ok(());
                }
                Err(err) => {
                    tracing::debug!(
                        field = schema.field(),
                        source = %schema.source(),
                        code = %err.code(),
                        "request failed validation: {}",
                        err
                    );
                    return Err(err);
                }
            }
        }

        Ok(())
    }

    /// Runs every applicable check for one schema.
    fn evaluate(
        &self,
        reader: &SourceReader,
        request: &mut InboundRequest,
        schema: &FieldSchema,
    ) -> Result<Verdict, ValidationError> {
        let resolved = reader.resolve(schema, request)?;

        if !checks::check_presence(&resolved) {
            if schema.is_required() {
                return Err(ValidationError::missing(schema.field()));
            }
            return Ok(match self.config.optional_absent {
                OptionalFieldPolicy::Skip => {
                    tracing::trace!(field = schema.field(), "optional field absent, skipping");
                    Verdict::Continue
                }
                OptionalFieldPolicy::AcceptRequest => Verdict::AcceptRequest,
            });
        }

        let raw = checks::raw_value(schema, &resolved)?;
        checks::check_type(schema, raw)?;

        if let Some(pattern) = schema.pattern() {
            checks::check_pattern(schema, pattern, raw)?;
        }
        if let Some(min) = schema.min() {
            checks::check_min(schema, min, raw)?;
        }
        if let Some(max) = schema.max() {
            checks::check_max(schema, max, raw)?;
        }

        Ok(Verdict::Continue)
    }
}

/// Validates `request` against `schemas` with the default configuration.
pub fn validate(request: &mut InboundRequest, schemas: &[FieldSchema]) -> ValidationOutcome {
    RequestValidator::default().validate(request, schemas)
}
