//! Numeric subtypes and the strict comparator used by range checks

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::error::ConfigError;

/// The specific subtype a number was materialized as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberKind {
    Integer,
    Long,
    Float,
    Double,
}

impl NumberKind {
    pub const ALL: [NumberKind; 4] = [
        NumberKind::Integer,
        NumberKind::Long,
        NumberKind::Float,
        NumberKind::Double,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            NumberKind::Integer => "Integer",
            NumberKind::Long => "Long",
            NumberKind::Float => "Float",
            NumberKind::Double => "Double",
        }
    }
}

impl fmt::Display for NumberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NumberKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NumberKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "numeric".to_string(),
                message: format!("'{}' is not a numeric subtype", s),
            })
    }
}

/// A number that remembers its subtype
///
/// Two numbers only compare when they share a subtype; there is no widening.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

/// Returned by [`Number::compare`] when the operands have different subtypes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindMismatch {
    pub left: NumberKind,
    pub right: NumberKind,
}

impl Number {
    pub fn kind(&self) -> NumberKind {
        match self {
            Number::Integer(_) => NumberKind::Integer,
            Number::Long(_) => NumberKind::Long,
            Number::Float(_) => NumberKind::Float,
            Number::Double(_) => NumberKind::Double,
        }
    }

    /// Zero of the same subtype as `self`
    pub fn zero_like(&self) -> Number {
        match self {
            Number::Integer(_) => Number::Integer(0),
            Number::Long(_) => Number::Long(0),
            Number::Float(_) => Number::Float(0.0),
            Number::Double(_) => Number::Double(0.0),
        }
    }

    /// Strict same-subtype comparison
    ///
    /// Floating values use total ordering, so `NaN` sorts above every other value
    /// instead of making the comparison undefined.
    pub fn compare(&self, other: &Number) -> Result<Ordering, KindMismatch> {
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) => Ok(a.cmp(b)),
            (Number::Long(a), Number::Long(b)) => Ok(a.cmp(b)),
            (Number::Float(a), Number::Float(b)) => Ok(a.total_cmp(b)),
            (Number::Double(a), Number::Double(b)) => Ok(a.total_cmp(b)),
            _ => Err(KindMismatch {
                left: self.kind(),
                right: other.kind(),
            }),
        }
    }

    /// Integral view used when a number bounds a length or a size
    ///
    /// Fractional parts are truncated toward zero.
    pub fn as_i64_truncated(&self) -> i64 {
        match *self {
            Number::Integer(v) => i64::from(v),
            Number::Long(v) => v,
            Number::Float(v) => v as i64,
            Number::Double(v) => v as i64,
        }
    }

    /// Convert into another subtype
    ///
    /// Floating values headed for an integral subtype are truncated toward zero.
    /// Returns `None` when the value does not fit the target; NaN and infinities
    /// never fit an integral subtype.
    pub fn coerce(self, kind: NumberKind) -> Option<Number> {
        let as_f64 = match self {
            Number::Integer(v) => f64::from(v),
            Number::Long(v) => v as f64,
            Number::Float(v) => f64::from(v),
            Number::Double(v) => v,
        };
        let coerced = match kind {
            NumberKind::Integer => Number::Integer(match self {
                Number::Integer(v) => v,
                Number::Long(v) => i32::try_from(v).ok()?,
                Number::Float(_) | Number::Double(_) => {
                    let t = as_f64.trunc();
                    if !(f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&t) {
                        return None;
                    }
                    t as i32
                }
            }),
            NumberKind::Long => Number::Long(match self {
                Number::Integer(v) => i64::from(v),
                Number::Long(v) => v,
                Number::Float(_) | Number::Double(_) => {
                    let t = as_f64.trunc();
                    // 2^63 is the first float past i64::MAX
                    if !(I64_MIN_F64..I64_LIMIT_F64).contains(&t) {
                        return None;
                    }
                    t as i64
                }
            }),
            NumberKind::Float => {
                let v = as_f64 as f32;
                if as_f64.is_finite() && !v.is_finite() {
                    return None;
                }
                Number::Float(v)
            }
            NumberKind::Double => Number::Double(as_f64),
        };
        Some(coerced)
    }
}

const I64_MIN_F64: f64 = -9_223_372_036_854_775_808.0;
const I64_LIMIT_F64: f64 = 9_223_372_036_854_775_808.0;

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(v) => write!(f, "{}", v),
            Number::Long(v) => write!(f, "{}", v),
            Number::Float(v) => write!(f, "{}", v),
            Number::Double(v) => write!(f, "{}", v),
        }
    }
}

impl From<i32> for Number {
    fn from(v: i32) -> Self {
        Number::Integer(v)
    }
}

impl From<i64> for Number {
    fn from(v: i64) -> Self {
        Number::Long(v)
    }
}

impl From<f32> for Number {
    fn from(v: f32) -> Self {
        Number::Float(v)
    }
}

impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Number::Double(v)
    }
}

impl From<&serde_json::Number> for Number {
    /// Integers that fit in 32 bits become `Integer`, wider ones `Long`;
    /// everything else is a `Double`.
    fn from(n: &serde_json::Number) -> Self {
        if let Some(v) = n.as_i64() {
            match i32::try_from(v) {
                Ok(small) => Number::Integer(small),
                Err(_) => Number::Long(v),
            }
        } else {
            Number::Double(n.as_f64().unwrap_or(f64::NAN))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_same_subtype_compares() {
        assert_eq!(
            Number::Integer(5).compare(&Number::Integer(7)),
            Ok(Ordering::Less)
        );
        assert_eq!(
            Number::Long(9).compare(&Number::Long(9)),
            Ok(Ordering::Equal)
        );
        assert_eq!(
            Number::Double(2.5).compare(&Number::Double(-1.0)),
            Ok(Ordering::Greater)
        );
    }

    #[test]
    fn test_cross_subtype_is_rejected() {
        let err = Number::Integer(5).compare(&Number::Long(5)).unwrap_err();
        assert_eq!(err.left, NumberKind::Integer);
        assert_eq!(err.right, NumberKind::Long);

        assert!(Number::Float(1.0).compare(&Number::Double(1.0)).is_err());
    }

    #[test]
    fn test_nan_has_an_order() {
        assert_eq!(
            Number::Double(f64::NAN).compare(&Number::Double(1.0)),
            Ok(Ordering::Greater)
        );
    }

    #[test]
    fn test_from_json_picks_narrowest_integer() {
        let small = json!(42);
        let wide = json!(4_000_000_000i64);
        let huge = json!(u64::MAX);
        let frac = json!(1.5);

        assert_eq!(Number::from(small.as_number().unwrap()), Number::Integer(42));
        assert_eq!(
            Number::from(wide.as_number().unwrap()),
            Number::Long(4_000_000_000)
        );
        assert_eq!(Number::from(huge.as_number().unwrap()).kind(), NumberKind::Double);
        assert_eq!(Number::from(frac.as_number().unwrap()), Number::Double(1.5));
    }

    #[test]
    fn test_zero_like_keeps_subtype() {
        assert_eq!(Number::Long(10).zero_like(), Number::Long(0));
        assert_eq!(Number::Double(3.0).zero_like(), Number::Double(0.0));
    }

    #[test]
    fn test_coerce() {
        assert_eq!(Number::Integer(7).coerce(NumberKind::Long), Some(Number::Long(7)));
        assert_eq!(
            Number::Double(7.9).coerce(NumberKind::Integer),
            Some(Number::Integer(7))
        );
        assert_eq!(
            Number::Long(3).coerce(NumberKind::Double),
            Some(Number::Double(3.0))
        );
        assert_eq!(
            Number::Double(-2.5).coerce(NumberKind::Long),
            Some(Number::Long(-2))
        );
    }

    #[test]
    fn test_coerce_rejects_values_that_do_not_fit() {
        assert_eq!(Number::Long(3_000_000_000).coerce(NumberKind::Integer), None);
        assert_eq!(
            Number::Long(i64::from(i32::MIN) - 1).coerce(NumberKind::Integer),
            None
        );
        assert_eq!(Number::Double(3e9).coerce(NumberKind::Integer), None);
        assert_eq!(Number::Double(1e19).coerce(NumberKind::Long), None);
        assert_eq!(Number::Double(f64::NAN).coerce(NumberKind::Integer), None);
        assert_eq!(Number::Double(f64::INFINITY).coerce(NumberKind::Long), None);
        assert_eq!(Number::Double(1e300).coerce(NumberKind::Float), None);
        assert_eq!(
            Number::Long(i64::from(i32::MAX)).coerce(NumberKind::Integer),
            Some(Number::Integer(i32::MAX))
        );
    }

    #[test]
    fn test_kind_from_str_is_case_insensitive() {
        assert_eq!("long".parse::<NumberKind>(), Ok(NumberKind::Long));
        assert_eq!("DOUBLE".parse::<NumberKind>(), Ok(NumberKind::Double));
        assert!("decimal".parse::<NumberKind>().is_err());
    }
}
