//! Typed errors for request validation
//!
//! Two families live here:
//!
//! - [`ValidationError`]: a request failed a rule. Always a client error (400).
//! - [`ConfigError`]: a validator was declared wrongly. Raised while building,
//!   never while evaluating.
//!
//! [`ValidationRejection`] is what the HTTP layer turns into a response.
//!
//! # Example
//!
//! ```rust,ignore
//! match validator.evaluate(&request).into_result() {
//!     Ok(()) => next.run(request).await,
//!     Err(rejection) => rejection.into_response(),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use super::number::{Number, NumberKind};
use super::predicate::TypeTag;

// =============================================================================
// Validation Errors
// =============================================================================

/// A single failed assertion
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A body path was read but the request carries no body
    #[error("No Body")]
    MissingBody,

    /// The body is present but is not a JSON object
    #[error("Body is not JSON")]
    NotJsonObject,

    /// A non-optional path segment resolved to nothing
    #[error("Parameter '{segment}' is not present or is null")]
    PathNotPresent { segment: String },

    /// The value is null where the rule requires one
    #[error("'{path}' cannot be NULL")]
    NullValue { path: String },

    /// The value has the wrong shape or numeric subtype
    #[error("'{path}' is not {expected}")]
    TypeMismatch { path: String, expected: TypeTag },

    /// The value is a string that does not match the required format
    #[error("'{path}' is not {expected}")]
    FormatMismatch { path: String, expected: TypeTag },

    /// Length, size or numeric value outside `[min, max)`
    #[error("'{path}' is outside the range [{min}:{max}]")]
    OutOfRange {
        path: String,
        min: Number,
        max: Number,
    },

    /// A range check compared numbers of different subtypes
    #[error("'{path}' cannot compare {found} with {bound} bounds")]
    IncompatibleComparison {
        path: String,
        found: NumberKind,
        bound: NumberKind,
    },

    /// No rule applies to the value's shape
    #[error("Failed to validate '{path}'")]
    Unvalidatable { path: String },

    /// Raised by a user supplied assertion
    #[error("{message}")]
    Custom { message: String },
}

impl ValidationError {
    pub fn custom(message: impl Into<String>) -> Self {
        ValidationError::Custom {
            message: message.into(),
        }
    }

    /// Every validation failure is the client's fault
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::MissingBody => "MISSING_BODY",
            ValidationError::NotJsonObject => "NOT_JSON_OBJECT",
            ValidationError::PathNotPresent { .. } => "PATH_NOT_PRESENT",
            ValidationError::NullValue { .. } => "NULL_VALUE",
            ValidationError::TypeMismatch { .. } => "TYPE_MISMATCH",
            ValidationError::FormatMismatch { .. } => "FORMAT_MISMATCH",
            ValidationError::OutOfRange { .. } => "OUT_OF_RANGE",
            ValidationError::IncompatibleComparison { .. } => "INCOMPATIBLE_COMPARISON",
            ValidationError::Unvalidatable { .. } => "VALIDATION_FAILED",
            ValidationError::Custom { .. } => "ASSERTION_FAILED",
        }
    }

    /// The field path this error is about, when it has one
    pub fn path(&self) -> Option<&str> {
        match self {
            ValidationError::NullValue { path }
            | ValidationError::TypeMismatch { path, .. }
            | ValidationError::FormatMismatch { path, .. }
            | ValidationError::OutOfRange { path, .. }
            | ValidationError::IncompatibleComparison { path, .. }
            | ValidationError::Unvalidatable { path } => Some(path),
            ValidationError::PathNotPresent { segment } => Some(segment),
            ValidationError::MissingBody
            | ValidationError::NotJsonObject
            | ValidationError::Custom { .. } => None,
        }
    }
}

// =============================================================================
// Rejection
// =============================================================================

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct ErrorDetail<'a> {
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<&'a str>,
    message: String,
}

/// A request rejected by a validator
///
/// Holds one error in fail-fast mode and every error, in rule order, otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationRejection {
    errors: Vec<ValidationError>,
}

impl ValidationRejection {
    pub(crate) fn new(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    pub fn error_code(&self) -> &'static str {
        match self.errors.as_slice() {
            [single] => single.error_code(),
            _ => "VALIDATION_FAILED",
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        let details: Vec<ErrorDetail<'_>> = self
            .errors
            .iter()
            .map(|e| ErrorDetail {
                code: e.error_code(),
                path: e.path(),
                message: e.to_string(),
            })
            .collect();

        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: Some(serde_json::json!({ "errors": details })),
        }
    }
}

impl std::fmt::Display for ValidationRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationRejection {}

impl From<ValidationError> for ValidationRejection {
    fn from(err: ValidationError) -> Self {
        Self::new(vec![err])
    }
}

impl IntoResponse for ValidationRejection {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors raised while declaring a validator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Field path must not be empty")]
    EmptyPath,

    #[error("Invalid field path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Unknown source '{name}'")]
    UnknownSource { name: String },

    #[error("Unknown predicate '{name}'")]
    UnknownPredicate { name: String },

    #[error("Unknown type '{name}'")]
    UnknownType { name: String },

    #[error("Missing field '{field}' in {context}")]
    MissingField { field: String, context: String },

    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}
