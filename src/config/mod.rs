//! Declarative validator configuration loaded from YAML
//!
//! ```yaml
//! fail_fast: false
//! rules:
//!   - source: body
//!     path: user.?email
//!     checks:
//!       - check: is
//!         type: Email
//!   - source: query
//!     path: page
//!     checks:
//!       - check: exists
//!       - check: between
//!         min: 1
//!         max: 100
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::core::{
    ConfigError, FieldRules, Number, NumberKind, Predicate, Source, TypeTag, Validator,
};

/// A whole validator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Stop at the first failing rule
    #[serde(default)]
    pub fail_fast: bool,

    /// Field rules, evaluated in this order
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

/// The checks for one field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    /// `query`, `form`, `body` or `context`
    pub source: String,

    /// Field name, or dotted path for `body`
    pub path: String,

    #[serde(default)]
    pub checks: Vec<CheckConfig>,
}

/// A single check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    /// `is`, `exists`, `between` or `size`
    pub check: String,

    /// Type name for `is`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<serde_json::Number>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<serde_json::Number>,

    /// Numeric subtype the bounds are converted to (`integer`, `long`, `float`, `double`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric: Option<String>,
}

impl ValidatorConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Concatenate rule lists in order
    ///
    /// The merged validator is fail-fast if any input was.
    pub fn merge(configs: Vec<ValidatorConfig>) -> Self {
        configs
            .into_iter()
            .fold(ValidatorConfig::default(), |mut merged, config| {
                merged.fail_fast |= config.fail_fast;
                merged.rules.extend(config.rules);
                merged
            })
    }

    /// Turn the declaration into a validator
    pub fn build_validator(&self) -> Result<Validator, ConfigError> {
        let mut builder = Validator::builder().fail_fast(self.fail_fast);
        for rule in &self.rules {
            builder = builder.field(rule.to_field_rules()?);
        }
        let validator = builder.build()?;
        tracing::debug!(
            rules = validator.rules().len(),
            fail_fast = validator.is_fail_fast(),
            "validator built from configuration"
        );
        Ok(validator)
    }
}

impl RuleConfig {
    pub fn to_field_rules(&self) -> Result<FieldRules, ConfigError> {
        let source: Source = self.source.parse()?;
        self.checks
            .iter()
            .try_fold(FieldRules::new(source, self.path.clone()), |rules, check| {
                Ok(rules.check(check.to_predicate(&self.path)?))
            })
    }
}

impl CheckConfig {
    pub fn to_predicate(&self, path: &str) -> Result<Predicate, ConfigError> {
        let context = format!("check '{}' on '{}'", self.check, path);
        match self.check.to_ascii_lowercase().as_str() {
            "is" => {
                let name = self.type_name.as_deref().ok_or_else(|| ConfigError::MissingField {
                    field: "type".to_string(),
                    context: context.clone(),
                })?;
                Ok(Predicate::IsType(name.parse::<TypeTag>()?))
            }
            "exists" => Ok(Predicate::Exists),
            "between" => Ok(Predicate::Between {
                min: self.bound(self.min.as_ref(), "min", &context)?,
                max: self.bound(self.max.as_ref(), "max", &context)?,
            }),
            "size" => Ok(Predicate::Size {
                max: self.bound(self.max.as_ref(), "max", &context)?,
            }),
            _ => Err(ConfigError::UnknownPredicate {
                name: self.check.clone(),
            }),
        }
    }

    fn bound(
        &self,
        value: Option<&serde_json::Number>,
        field: &str,
        context: &str,
    ) -> Result<Number, ConfigError> {
        let value = value.ok_or_else(|| ConfigError::MissingField {
            field: field.to_string(),
            context: context.to_string(),
        })?;
        let number = Number::from(value);
        let Some(kind) = &self.numeric else {
            return Ok(number);
        };
        let kind: NumberKind = kind.parse()?;
        number.coerce(kind).ok_or_else(|| ConfigError::InvalidValue {
            field: field.to_string(),
            message: format!("{} does not fit a {} bound in {}", number, kind, context),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
fail_fast: true
rules:
  - source: body
    path: user.?email
    checks:
      - check: is
        type: Email
  - source: query
    path: page
    checks:
      - check: exists
      - check: between
        min: 1
        max: 100
"#;

    #[test]
    fn test_parse_sample() {
        let config = ValidatorConfig::from_yaml_str(SAMPLE).unwrap();
        assert!(config.fail_fast);
        assert_eq!(config.rules.len(), 2);
        assert_eq!(config.rules[1].checks.len(), 2);

        let validator = config.build_validator().unwrap();
        assert!(validator.is_fail_fast());
        assert_eq!(validator.rules().len(), 3);
    }

    #[test]
    fn test_defaults() {
        let config = ValidatorConfig::from_yaml_str("rules: []").unwrap();
        assert!(!config.fail_fast);
        assert!(config.build_validator().unwrap().rules().is_empty());
    }

    #[test]
    fn test_numeric_hint_coerces_bounds() {
        let check = CheckConfig {
            check: "between".to_string(),
            type_name: None,
            min: Some(serde_json::Number::from(0)),
            max: Some(serde_json::Number::from(10)),
            numeric: Some("long".to_string()),
        };
        assert_eq!(
            check.to_predicate("n").unwrap(),
            Predicate::Between {
                min: Number::Long(0),
                max: Number::Long(10)
            }
        );
    }

    #[test]
    fn test_numeric_hint_rejects_bounds_that_do_not_fit() {
        let check = CheckConfig {
            check: "between".to_string(),
            type_name: None,
            min: Some(serde_json::Number::from(0)),
            max: Some(serde_json::Number::from(3_000_000_000i64)),
            numeric: Some("integer".to_string()),
        };
        let err = check.to_predicate("n").unwrap_err();
        assert!(matches!(
            &err,
            ConfigError::InvalidValue { field, .. } if field == "max"
        ));
    }

    #[test]
    fn test_unknown_names() {
        let yaml = r#"
rules:
  - source: header
    path: x
"#;
        let err = ValidatorConfig::from_yaml_str(yaml)
            .unwrap()
            .build_validator()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownSource {
                name: "header".to_string()
            }
        );

        let yaml = r#"
rules:
  - source: body
    path: x
    checks:
      - check: matches
"#;
        let err = ValidatorConfig::from_yaml_str(yaml)
            .unwrap()
            .build_validator()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownPredicate {
                name: "matches".to_string()
            }
        );
    }

    #[test]
    fn test_missing_arguments() {
        let yaml = r#"
rules:
  - source: body
    path: x
    checks:
      - check: is
"#;
        let err = ValidatorConfig::from_yaml_str(yaml)
            .unwrap()
            .build_validator()
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { ref field, .. } if field == "type"));

        let yaml = r#"
rules:
  - source: body
    path: x
    checks:
      - check: between
        min: 1
"#;
        let err = ValidatorConfig::from_yaml_str(yaml)
            .unwrap()
            .build_validator()
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { ref field, .. } if field == "max"));
    }

    #[test]
    fn test_yaml_serialization() {
        let config = ValidatorConfig::from_yaml_str(SAMPLE).unwrap();
        let yaml = serde_yaml::to_string(&config).unwrap();

        let parsed = ValidatorConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed.rules.len(), config.rules.len());
        assert_eq!(parsed.fail_fast, config.fail_fast);
    }
}
