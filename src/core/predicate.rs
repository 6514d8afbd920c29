//! The closed set of checks a field can be held to

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::error::{ConfigError, ValidationError};
use super::field::FieldSpec;
use super::format;
use super::number::Number;
use super::value::FieldValue;

/// Structural, numeric and string-format types a field can be required to have
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    // base json types
    JsonObject,
    JsonArray,
    String,
    Number,
    Boolean,
    Null,
    // specific numeric subtypes
    Integer,
    Long,
    Double,
    // string formats
    DateTime,
    Date,
    Time,
    Email,
    IPAddress,
    IPV6Address,
    URI,
    Hostname,
    Alpha,
    Alphanumeric,
}

impl TypeTag {
    pub const ALL: [TypeTag; 19] = [
        TypeTag::JsonObject,
        TypeTag::JsonArray,
        TypeTag::String,
        TypeTag::Number,
        TypeTag::Boolean,
        TypeTag::Null,
        TypeTag::Integer,
        TypeTag::Long,
        TypeTag::Double,
        TypeTag::DateTime,
        TypeTag::Date,
        TypeTag::Time,
        TypeTag::Email,
        TypeTag::IPAddress,
        TypeTag::IPV6Address,
        TypeTag::URI,
        TypeTag::Hostname,
        TypeTag::Alpha,
        TypeTag::Alphanumeric,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TypeTag::JsonObject => "JsonObject",
            TypeTag::JsonArray => "JsonArray",
            TypeTag::String => "String",
            TypeTag::Number => "Number",
            TypeTag::Boolean => "Boolean",
            TypeTag::Null => "Null",
            TypeTag::Integer => "Integer",
            TypeTag::Long => "Long",
            TypeTag::Double => "Double",
            TypeTag::DateTime => "DateTime",
            TypeTag::Date => "Date",
            TypeTag::Time => "Time",
            TypeTag::Email => "Email",
            TypeTag::IPAddress => "IPAddress",
            TypeTag::IPV6Address => "IPV6Address",
            TypeTag::URI => "URI",
            TypeTag::Hostname => "Hostname",
            TypeTag::Alpha => "Alpha",
            TypeTag::Alphanumeric => "Alphanumeric",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TypeTag {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeTag::ALL
            .into_iter()
            .find(|tag| tag.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownType {
                name: s.to_string(),
            })
    }
}

/// A check applied to one resolved field
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// The value has the given type or format. `null` passes on optional paths.
    IsType(TypeTag),
    /// The value is not `null`, whatever the path says about optionality
    Exists,
    /// `min <= x < max` where `x` is a string length, a number or an array size
    Between { min: Number, max: Number },
    /// `Between` with a zero lower bound
    Size { max: Number },
}

impl Predicate {
    pub fn between(min: impl Into<Number>, max: impl Into<Number>) -> Self {
        Predicate::Between {
            min: min.into(),
            max: max.into(),
        }
    }

    pub fn size(max: impl Into<Number>) -> Self {
        Predicate::Size { max: max.into() }
    }

    /// Name used in configuration files
    pub fn name(&self) -> &'static str {
        match self {
            Predicate::IsType(_) => "is",
            Predicate::Exists => "exists",
            Predicate::Between { .. } => "between",
            Predicate::Size { .. } => "size",
        }
    }

    /// Test an already resolved value
    pub fn check(&self, field: &FieldSpec, value: &FieldValue) -> Result<(), ValidationError> {
        match self {
            Predicate::IsType(tag) => check_type(*tag, field, value),
            Predicate::Exists => {
                if value.is_null() {
                    return Err(ValidationError::NullValue {
                        path: field.path().to_string(),
                    });
                }
                Ok(())
            }
            Predicate::Between { min, max } => check_range(field, value, min, max),
            Predicate::Size { max } => check_range(field, value, &max.zero_like(), max),
        }
    }
}

fn check_type(tag: TypeTag, field: &FieldSpec, value: &FieldValue) -> Result<(), ValidationError> {
    let path = field.path();

    if value.is_null() {
        if field.is_optional() || tag == TypeTag::Null {
            return Ok(());
        }
        return Err(ValidationError::NullValue {
            path: path.to_string(),
        });
    }

    let accepted = match tag {
        TypeTag::JsonObject => matches!(value, FieldValue::Object(_)),
        TypeTag::JsonArray => matches!(value, FieldValue::Array(_)),
        TypeTag::String => matches!(value, FieldValue::String(_)),
        TypeTag::Number => matches!(value, FieldValue::Number(_)),
        TypeTag::Boolean => matches!(value, FieldValue::Boolean(_)),
        TypeTag::Integer => matches!(value, FieldValue::Number(Number::Integer(_))),
        TypeTag::Long => matches!(value, FieldValue::Number(Number::Long(_))),
        TypeTag::Double => matches!(value, FieldValue::Number(Number::Double(_))),
        TypeTag::DateTime
        | TypeTag::Date
        | TypeTag::Time
        | TypeTag::Email
        | TypeTag::IPAddress
        | TypeTag::IPV6Address
        | TypeTag::URI
        | TypeTag::Hostname
        | TypeTag::Alpha
        | TypeTag::Alphanumeric => return check_format(tag, path, value),
        // non-null value against the Null tag
        TypeTag::Null => {
            return Err(ValidationError::Unvalidatable {
                path: path.to_string(),
            });
        }
    };

    if accepted {
        Ok(())
    } else {
        Err(ValidationError::TypeMismatch {
            path: path.to_string(),
            expected: tag,
        })
    }
}

fn check_format(tag: TypeTag, path: &str, value: &FieldValue) -> Result<(), ValidationError> {
    let Some(text) = value.as_str() else {
        return Err(ValidationError::TypeMismatch {
            path: path.to_string(),
            expected: tag,
        });
    };
    let Some(pattern) = format::pattern_for(tag) else {
        return Err(ValidationError::Unvalidatable {
            path: path.to_string(),
        });
    };
    if pattern.is_match(text) {
        Ok(())
    } else {
        Err(ValidationError::FormatMismatch {
            path: path.to_string(),
            expected: tag,
        })
    }
}

fn check_range(
    field: &FieldSpec,
    value: &FieldValue,
    min: &Number,
    max: &Number,
) -> Result<(), ValidationError> {
    let path = field.path();
    let out_of_range = || ValidationError::OutOfRange {
        path: path.to_string(),
        min: *min,
        max: *max,
    };

    let within = match value {
        FieldValue::Null => {
            return Err(ValidationError::NullValue {
                path: path.to_string(),
            });
        }
        FieldValue::String(s) => count_within(s.chars().count(), min, max),
        FieldValue::Array(items) => count_within(items.len(), min, max),
        FieldValue::Number(n) => {
            let compare = |bound: &Number| {
                n.compare(bound)
                    .map_err(|mismatch| ValidationError::IncompatibleComparison {
                        path: path.to_string(),
                        found: mismatch.left,
                        bound: mismatch.right,
                    })
            };
            compare(min)? != Ordering::Less && compare(max)? == Ordering::Less
        }
        FieldValue::Boolean(_) | FieldValue::Object(_) => {
            return Err(ValidationError::Unvalidatable {
                path: path.to_string(),
            });
        }
    };

    if within { Ok(()) } else { Err(out_of_range()) }
}

fn count_within(count: usize, min: &Number, max: &Number) -> bool {
    let count = i64::try_from(count).unwrap_or(i64::MAX);
    count >= min.as_i64_truncated() && count < max.as_i64_truncated()
}
