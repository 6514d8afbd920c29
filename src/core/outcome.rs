//! Result of evaluating a validator against one request

use super::error::{ValidationError, ValidationRejection};

/// Separator between messages of an aggregated failure
pub const MESSAGE_SEPARATOR: &str = "; ";

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    Pass,
    /// Failures in rule registration order; exactly one in fail-fast mode
    Fail(Vec<ValidationError>),
}

impl ValidationOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, ValidationOutcome::Pass)
    }

    pub fn errors(&self) -> &[ValidationError] {
        match self {
            ValidationOutcome::Pass => &[],
            ValidationOutcome::Fail(errors) => errors,
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.errors().iter().map(ToString::to_string).collect()
    }

    /// All failure messages joined into one, or `None` on success
    pub fn message(&self) -> Option<String> {
        match self {
            ValidationOutcome::Pass => None,
            ValidationOutcome::Fail(_) => Some(self.messages().join(MESSAGE_SEPARATOR)),
        }
    }

    pub fn into_result(self) -> Result<(), ValidationRejection> {
        match self {
            ValidationOutcome::Pass => Ok(()),
            ValidationOutcome::Fail(errors) => Err(ValidationRejection::new(errors)),
        }
    }
}
