//! # HTTP Integration
//!
//! Axum glue for running schema validation in front of a handler.
//!
//! ```ignore
//! let guard = Arc::new(SchemaGuard::new(vec![
//!     FieldSchema::required_string("name", Source::Body).with_min(4),
//! ]));
//! let app = Router::new()
//!     .route("/people", post(create_person))
//!     .layer(axum::middleware::from_fn_with_state(guard, guard_request));
//! ```
//!
//! Rejected requests get `400 Bad Request` with a JSON body naming the
//! failing field and error code.

mod guard;
mod response;

pub use guard::{guard_request, SchemaGuard};
pub use response::ErrorResponse;
