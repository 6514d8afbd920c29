//! # fieldguard
//!
//! Declarative validation of request fields.
//!
//! ## Features
//!
//! - **Four sources**: query parameters, form parameters, JSON body paths and
//!   per-request context attributes
//! - **Optional path segments**: `user.?address.city` tolerates a missing address
//! - **Closed type catalogue**: structural types, exact numeric subtypes and
//!   regex-backed string formats (date, email, IP, URI, hostname, ...)
//! - **Range checks**: string length, array size or strictly typed numeric bounds
//! - **Fail-fast or aggregate**: stop at the first failure or report all of them
//! - **YAML configuration** and an **axum middleware**
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fieldguard::prelude::*;
//!
//! let validator = Validator::builder()
//!     .field(request_body("name").is(TypeTag::String).between(1, 64))
//!     .field(request_body("age").is(TypeTag::Integer))
//!     .field(request_body("contact.?email").is(TypeTag::Email))
//!     .build()?;
//!
//! let request = RequestSnapshot::new()
//!     .with_json_body(serde_json::json!({"name": 42, "age": "x"}));
//!
//! let outcome = validator.evaluate(&request);
//! assert_eq!(
//!     outcome.message().as_deref(),
//!     Some("'name' is not String; 'age' is not Integer")
//! );
//! ```

pub mod config;
pub mod core;
pub mod server;

/// Re-exports of commonly used types and functions
pub mod prelude {
    // === Engine ===
    pub use crate::core::{
        Assertion, AssertionRule, ContextAttributes, FieldRules, FieldSpec, FieldValue, Number,
        NumberKind, Predicate, RequestSnapshot, RequestView, Source, TypeTag, ValidationOutcome,
        Validator, ValidatorBuilder, request_body, request_context, request_form, request_param,
    };

    // === Errors ===
    pub use crate::core::{ConfigError, ErrorResponse, ValidationError, ValidationRejection};

    // === Config ===
    pub use crate::config::{CheckConfig, RuleConfig, ValidatorConfig};

    // === Server ===
    pub use crate::server::{RequestValidation, validate_request};
}
