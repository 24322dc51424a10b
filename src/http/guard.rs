//! # Schema Guard Middleware
//!
//! Buffers the request body, validates the request, and forwards it with
//! an equivalent body when it passes.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::request::InboundRequest;
use crate::schema::{FieldSchema, RequestValidator, ValidationError, ValidationOutcome};

/// A validator bound to the schemas of one route
#[derive(Debug, Clone)]
pub struct SchemaGuard {
    validator: RequestValidator,
    schemas: Vec<FieldSchema>,
}

impl SchemaGuard {
    /// Guard `schemas` with the default validator configuration
    pub fn new(schemas: Vec<FieldSchema>) -> Self {
        Self::with_validator(RequestValidator::default(), schemas)
    }

    pub fn with_validator(validator: RequestValidator, schemas: Vec<FieldSchema>) -> Self {
        Self { validator, schemas }
    }

    pub fn schemas(&self) -> &[FieldSchema] {
        &self.schemas
    }

    pub fn validator(&self) -> &RequestValidator {
        &self.validator
    }

    /// Validate a request against the guarded schemas
    pub fn check(&self, request: &mut InboundRequest) -> ValidationOutcome {
        self.validator.validate(request, &self.schemas)
    }
}

/// Axum middleware that rejects requests failing the guard's schemas.
///
/// Use with `axum::middleware::from_fn_with_state`.
pub async fn guard_request(
    State(guard): State<Arc<SchemaGuard>>,
    request: Request,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();
    let limit = guard.validator.config().max_body_bytes;

    let bytes = match axum::body::to_bytes(body, limit).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::debug!(uri = %parts.uri, error = %err, "request body could not be buffered");
            return ValidationError::malformed_body(format!("request body could not be buffered: {}", err))
                .into_response();
        }
    };

    let mut inbound = InboundRequest::new(parts.uri.clone(), parts.headers.clone(), bytes.clone());
    if let Err(err) = guard.check(&mut inbound) {
        return err.into_response();
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}
