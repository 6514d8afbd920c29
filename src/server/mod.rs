//! HTTP integration
//!
//! A thin axum middleware that materializes the request, evaluates a
//! [`Validator`](crate::core::Validator) against it and turns failures into
//! `400 Bad Request` responses.

pub mod middleware;

pub use middleware::{DEFAULT_BODY_LIMIT, RequestValidation, validate_request};
