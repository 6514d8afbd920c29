//! Core validation engine: values, field resolution, predicates and the validator

pub mod error;
pub mod field;
pub mod format;
pub mod number;
pub mod outcome;
pub mod predicate;
pub mod request;
pub mod rule;
pub mod validator;
pub mod value;

pub use error::{ConfigError, ErrorResponse, ValidationError, ValidationRejection};
pub use field::{FieldSpec, Segment, Source};
pub use number::{Number, NumberKind};
pub use outcome::ValidationOutcome;
pub use predicate::{Predicate, TypeTag};
pub use request::{ContextAttributes, RequestSnapshot, RequestView};
pub use rule::{Assertion, AssertionRule};
pub use validator::{
    FieldRules, Validator, ValidatorBuilder, request_body, request_context, request_form,
    request_param,
};
pub use value::FieldValue;
