//! Assertion rules: the unit a validator evaluates

use std::fmt;
use std::sync::Arc;

use super::error::ValidationError;
use super::field::FieldSpec;
use super::predicate::Predicate;
use super::request::RequestView;

/// A check over the whole request, for anything the field predicates can't express
///
/// Closures with the right signature are assertions:
///
/// ```rust,ignore
/// let same_password = |req: &dyn RequestView| {
///     if req.form_parameter("password") == req.form_parameter("confirm") {
///         Ok(())
///     } else {
///         Err(ValidationError::custom("passwords do not match"))
///     }
/// };
/// ```
pub trait Assertion: Send + Sync {
    fn check(&self, request: &dyn RequestView) -> Result<(), ValidationError>;
}

impl<F> Assertion for F
where
    F: Fn(&dyn RequestView) -> Result<(), ValidationError> + Send + Sync,
{
    fn check(&self, request: &dyn RequestView) -> Result<(), ValidationError> {
        self(request)
    }
}

/// One registered rule
#[derive(Clone)]
pub enum AssertionRule {
    /// Resolve `field`, then test it with `predicate`
    Field {
        field: FieldSpec,
        predicate: Predicate,
    },
    /// A user supplied assertion
    Custom(Arc<dyn Assertion>),
}

impl AssertionRule {
    pub fn field(field: FieldSpec, predicate: Predicate) -> Self {
        AssertionRule::Field { field, predicate }
    }

    pub fn custom(assertion: impl Assertion + 'static) -> Self {
        AssertionRule::Custom(Arc::new(assertion))
    }

    pub fn evaluate(&self, request: &dyn RequestView) -> Result<(), ValidationError> {
        match self {
            AssertionRule::Field { field, predicate } => {
                let value = field.resolve(request)?;
                predicate.check(field, &value)
            }
            AssertionRule::Custom(assertion) => assertion.check(request),
        }
    }
}

impl fmt::Debug for AssertionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssertionRule::Field { field, predicate } => f
                .debug_struct("Field")
                .field("field", field)
                .field("predicate", predicate)
                .finish(),
            AssertionRule::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
