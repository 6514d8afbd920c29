//! The validator: an ordered, immutable list of rules plus an evaluation policy
//!
//! # Example
//!
//! ```rust,ignore
//! use fieldguard::prelude::*;
//!
//! let validator = Validator::builder()
//!     .field(request_body("name").is(TypeTag::String).between(1, 64))
//!     .field(request_body("age").is(TypeTag::Integer))
//!     .field(request_param("?page").is(TypeTag::Alphanumeric))
//!     .build()?;
//!
//! match validator.evaluate(&request) {
//!     ValidationOutcome::Pass => { /* carry on */ }
//!     ValidationOutcome::Fail(errors) => { /* 400 */ }
//! }
//! ```

use super::error::{ConfigError, ValidationError};
use super::field::{FieldSpec, Source};
use super::number::Number;
use super::outcome::ValidationOutcome;
use super::predicate::{Predicate, TypeTag};
use super::request::RequestView;
use super::rule::{Assertion, AssertionRule};

/// Rules evaluated in registration order against each request
///
/// Built once, then only read. Share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Validator {
    rules: Vec<AssertionRule>,
    fail_fast: bool,
}

impl Validator {
    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::default()
    }

    pub fn rules(&self) -> &[AssertionRule] {
        &self.rules
    }

    pub fn is_fail_fast(&self) -> bool {
        self.fail_fast
    }

    /// Run every rule against `request`
    ///
    /// In fail-fast mode the first failure is returned alone and later rules are
    /// skipped. Otherwise every failure is collected in rule order.
    pub fn evaluate(&self, request: &dyn RequestView) -> ValidationOutcome {
        let mut failures: Vec<ValidationError> = Vec::new();

        for (index, rule) in self.rules.iter().enumerate() {
            let Err(error) = rule.evaluate(request) else {
                continue;
            };
            tracing::trace!(rule = index, error = %error, "validation rule failed");

            if self.fail_fast {
                tracing::debug!(rule = index, "request rejected on first failing rule");
                return ValidationOutcome::Fail(vec![error]);
            }
            failures.push(error);
        }

        if failures.is_empty() {
            ValidationOutcome::Pass
        } else {
            tracing::debug!(
                rules = self.rules.len(),
                failures = failures.len(),
                "request rejected"
            );
            ValidationOutcome::Fail(failures)
        }
    }
}

/// Collects rules for a [`Validator`]
#[derive(Debug, Default)]
pub struct ValidatorBuilder {
    rules: Vec<AssertionRule>,
    fail_fast: bool,
    error: Option<ConfigError>,
}

impl ValidatorBuilder {
    /// Stop at the first failing rule instead of collecting all of them
    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Register one rule per predicate chained on `field`, in chaining order
    pub fn field(mut self, field: FieldRules) -> Self {
        if self.error.is_some() {
            return self;
        }
        match FieldSpec::new(field.source, field.path) {
            Ok(spec) => self.rules.extend(
                field
                    .predicates
                    .into_iter()
                    .map(|predicate| AssertionRule::field(spec.clone(), predicate)),
            ),
            Err(e) => self.error = Some(e),
        }
        self
    }

    /// Register a custom assertion over the whole request
    pub fn assert(mut self, assertion: impl Assertion + 'static) -> Self {
        self.rules.push(AssertionRule::custom(assertion));
        self
    }

    /// Register an already built rule
    pub fn rule(mut self, rule: AssertionRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Finish, reporting the first invalid field declaration
    pub fn build(self) -> Result<Validator, ConfigError> {
        if let Some(e) = self.error {
            return Err(e);
        }
        Ok(Validator {
            rules: self.rules,
            fail_fast: self.fail_fast,
        })
    }
}

/// Predicates chained on one field, registered together
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRules {
    source: Source,
    path: String,
    predicates: Vec<Predicate>,
}

impl FieldRules {
    pub fn new(source: Source, path: impl Into<String>) -> Self {
        Self {
            source,
            path: path.into(),
            predicates: Vec::new(),
        }
    }

    pub fn is(self, tag: TypeTag) -> Self {
        self.check(Predicate::IsType(tag))
    }

    pub fn exists(self) -> Self {
        self.check(Predicate::Exists)
    }

    pub fn between(self, min: impl Into<Number>, max: impl Into<Number>) -> Self {
        self.check(Predicate::between(min, max))
    }

    pub fn size(self, max: impl Into<Number>) -> Self {
        self.check(Predicate::size(max))
    }

    pub fn check(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }
}

/// A query string parameter
pub fn request_param(name: impl Into<String>) -> FieldRules {
    FieldRules::new(Source::QueryParameter, name)
}

/// A url-encoded form parameter
pub fn request_form(name: impl Into<String>) -> FieldRules {
    FieldRules::new(Source::FormParameter, name)
}

/// A dotted path into the JSON body; `?` marks optional segments
pub fn request_body(path: impl Into<String>) -> FieldRules {
    FieldRules::new(Source::BodyPath, path)
}

/// A context attribute set earlier in the pipeline
pub fn request_context(key: impl Into<String>) -> FieldRules {
    FieldRules::new(Source::ContextAttribute, key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::request::RequestSnapshot;
    use serde_json::json;

    fn person_validator(fail_fast: bool) -> Validator {
        Validator::builder()
            .fail_fast(fail_fast)
            .field(request_body("name").is(TypeTag::String))
            .field(request_body("age").is(TypeTag::Integer))
            .build()
            .expect("valid validator")
    }

    #[test]
    fn test_passes_valid_request() {
        let request = RequestSnapshot::new().with_json_body(json!({"name": "Ada", "age": 36}));
        assert_eq!(person_validator(false).evaluate(&request), ValidationOutcome::Pass);
    }

    #[test]
    fn test_aggregate_collects_in_order() {
        let request = RequestSnapshot::new().with_json_body(json!({"name": 42, "age": "x"}));
        let outcome = person_validator(false).evaluate(&request);
        assert_eq!(
            outcome.messages(),
            vec!["'name' is not String", "'age' is not Integer"]
        );
    }

    #[test]
    fn test_fail_fast_stops_at_first() {
        let request = RequestSnapshot::new().with_json_body(json!({"name": 42, "age": "x"}));
        let outcome = person_validator(true).evaluate(&request);
        assert_eq!(outcome.messages(), vec!["'name' is not String"]);
    }

    #[test]
    fn test_fail_fast_skips_later_rules() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let validator = Validator::builder()
            .fail_fast(true)
            .field(request_body("name").exists())
            .assert(move |_: &dyn RequestView| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<(), ValidationError>(())
            })
            .build()
            .expect("valid validator");

        let outcome = validator.evaluate(&RequestSnapshot::new().with_json_body(json!({})));
        assert!(!outcome.is_pass());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_chained_predicates_register_in_order() {
        let validator = Validator::builder()
            .field(request_body("code").is(TypeTag::Alpha).size(4).exists())
            .build()
            .expect("valid validator");
        assert_eq!(validator.rules().len(), 3);

        let request = RequestSnapshot::new().with_json_body(json!({"code": "abc1e"}));
        assert_eq!(
            validator.evaluate(&request).messages(),
            vec!["'code' is not Alpha", "'code' is outside the range [0:4]"]
        );
    }

    #[test]
    fn test_invalid_path_fails_build() {
        let result = Validator::builder()
            .field(request_body("a.b?c").exists())
            .field(request_body("ok").exists())
            .build();
        assert!(matches!(result, Err(ConfigError::InvalidPath { .. })));
    }

    #[test]
    fn test_empty_validator_passes() {
        let validator = Validator::builder().build().expect("valid validator");
        assert!(validator.evaluate(&RequestSnapshot::new()).is_pass());
    }

    #[test]
    fn test_validator_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Validator>();
    }
}
