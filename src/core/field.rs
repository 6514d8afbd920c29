//! Field specifications and resolution against a request

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

use super::error::{ConfigError, ValidationError};
use super::request::RequestView;
use super::value::{FieldValue, NULL};

const OPTIONAL_MARKER: char = '?';

/// Where a field is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    QueryParameter,
    FormParameter,
    BodyPath,
    ContextAttribute,
}

impl Source {
    /// Name used in configuration files
    pub fn name(&self) -> &'static str {
        match self {
            Source::QueryParameter => "query",
            Source::FormParameter => "form",
            Source::BodyPath => "body",
            Source::ContextAttribute => "context",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Source {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "query" | "param" => Ok(Source::QueryParameter),
            "form" => Ok(Source::FormParameter),
            "body" => Ok(Source::BodyPath),
            "context" => Ok(Source::ContextAttribute),
            _ => Err(ConfigError::UnknownSource {
                name: s.to_string(),
            }),
        }
    }
}

/// One dot-separated component of a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    name: String,
    optional: bool,
}

impl Segment {
    fn parse(raw: &str, path: &str) -> Result<Self, ConfigError> {
        let (optional, name) = match raw.strip_prefix(OPTIONAL_MARKER) {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        if name.is_empty() {
            return Err(ConfigError::InvalidPath {
                path: path.to_string(),
                reason: "empty segment".to_string(),
            });
        }
        if name.contains(OPTIONAL_MARKER) {
            return Err(ConfigError::InvalidPath {
                path: path.to_string(),
                reason: format!("'{}' may only start a segment", OPTIONAL_MARKER),
            });
        }
        Ok(Self {
            name: name.to_string(),
            optional,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

/// A field to read: a source plus a path into it
///
/// Body paths are split on `.`; a segment starting with `?` is optional. Flat
/// sources use the whole path as one key, a leading `?` still marking it optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    source: Source,
    path: String,
    segments: Vec<Segment>,
}

impl FieldSpec {
    pub fn new(source: Source, path: impl Into<String>) -> Result<Self, ConfigError> {
        let path = path.into();
        if path.is_empty() {
            return Err(ConfigError::EmptyPath);
        }

        let segments = match source {
            Source::BodyPath => path
                .split('.')
                .map(|raw| Segment::parse(raw, &path))
                .collect::<Result<Vec<_>, _>>()?,
            Source::QueryParameter | Source::FormParameter | Source::ContextAttribute => {
                let (optional, name) = match path.strip_prefix(OPTIONAL_MARKER) {
                    Some(rest) => (true, rest),
                    None => (false, path.as_str()),
                };
                if name.is_empty() {
                    return Err(ConfigError::EmptyPath);
                }
                vec![Segment {
                    name: name.to_string(),
                    optional,
                }]
            }
        };

        Ok(Self {
            source,
            path,
            segments,
        })
    }

    pub fn source(&self) -> Source {
        self.source
    }

    /// The path as written, optional markers included
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True when any segment carries the optional marker
    pub fn is_optional(&self) -> bool {
        self.segments.iter().any(Segment::is_optional)
    }

    /// Read this field from `request`
    ///
    /// Absent flat fields resolve to `null`. Body paths fail hard when there is
    /// no object body to walk, or when a required intermediate segment is
    /// missing; an optional one stands in for an empty object.
    pub fn resolve<'r>(
        &self,
        request: &'r dyn RequestView,
    ) -> Result<Cow<'r, FieldValue>, ValidationError> {
        let key = self.segments[0].name();
        match self.source {
            Source::QueryParameter => Ok(flat(request.parameter(key))),
            Source::FormParameter => Ok(flat(request.form_parameter(key))),
            Source::ContextAttribute => Ok(Cow::Borrowed(
                request.context_attribute(key).unwrap_or(&NULL),
            )),
            Source::BodyPath => self.resolve_body(request).map(Cow::Borrowed),
        }
    }

    fn resolve_body<'r>(&self, request: &'r dyn RequestView) -> Result<&'r FieldValue, ValidationError> {
        let body = request.body().ok_or(ValidationError::MissingBody)?;
        let FieldValue::Object(root) = body else {
            return Err(ValidationError::NotJsonObject);
        };

        let Some((last, parents)) = self.segments.split_last() else {
            return Ok(&NULL);
        };

        // `None` stands for an empty object substituted on an optional segment
        let mut current: Option<&'r IndexMap<String, FieldValue>> = Some(root);
        for segment in parents {
            current = match current.and_then(|obj| obj.get(segment.name())) {
                Some(FieldValue::Object(child)) => Some(child),
                _ if segment.is_optional() => None,
                _ => {
                    return Err(ValidationError::PathNotPresent {
                        segment: segment.name().to_string(),
                    });
                }
            };
        }

        Ok(current
            .and_then(|obj| obj.get(last.name()))
            .unwrap_or(&NULL))
    }
}

fn flat(value: Option<&str>) -> Cow<'static, FieldValue> {
    match value {
        Some(s) => Cow::Owned(FieldValue::String(s.to_string())),
        None => Cow::Borrowed(&NULL),
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::request::RequestSnapshot;
    use serde_json::json;

    fn body_spec(path: &str) -> FieldSpec {
        FieldSpec::new(Source::BodyPath, path).expect("valid path")
    }

    // === construction ===

    #[test]
    fn test_empty_path_is_rejected() {
        assert_eq!(
            FieldSpec::new(Source::BodyPath, ""),
            Err(ConfigError::EmptyPath)
        );
        assert_eq!(
            FieldSpec::new(Source::QueryParameter, "?"),
            Err(ConfigError::EmptyPath)
        );
    }

    #[test]
    fn test_marker_only_at_segment_start() {
        assert!(FieldSpec::new(Source::BodyPath, "a.b?c").is_err());
        assert!(FieldSpec::new(Source::BodyPath, "a..b").is_err());
        assert!(FieldSpec::new(Source::BodyPath, "??a").is_err());
        assert!(FieldSpec::new(Source::BodyPath, "?a.?b.c").is_ok());
    }

    #[test]
    fn test_is_optional() {
        assert!(!body_spec("a.b.c").is_optional());
        assert!(body_spec("?a.b").is_optional());
        assert!(body_spec("a.?b").is_optional());
        assert!(
            FieldSpec::new(Source::QueryParameter, "?page")
                .expect("valid")
                .is_optional()
        );
    }

    #[test]
    fn test_source_from_str() {
        assert_eq!("body".parse::<Source>(), Ok(Source::BodyPath));
        assert_eq!("Query".parse::<Source>(), Ok(Source::QueryParameter));
        assert!(matches!(
            "header".parse::<Source>(),
            Err(ConfigError::UnknownSource { .. })
        ));
    }

    // === flat sources ===

    #[test]
    fn test_flat_sources_resolve_or_null() {
        let request = RequestSnapshot::new()
            .with_param("page", "2")
            .with_form_param("title", "hello")
            .with_context("user_id", 7);

        let page = FieldSpec::new(Source::QueryParameter, "page").expect("valid");
        let missing = FieldSpec::new(Source::QueryParameter, "size").expect("valid");
        let title = FieldSpec::new(Source::FormParameter, "?title").expect("valid");
        let user = FieldSpec::new(Source::ContextAttribute, "user_id").expect("valid");

        assert_eq!(*page.resolve(&request).expect("ok"), FieldValue::from("2"));
        assert!(missing.resolve(&request).expect("ok").is_null());
        assert_eq!(*title.resolve(&request).expect("ok"), FieldValue::from("hello"));
        assert_eq!(*user.resolve(&request).expect("ok"), FieldValue::from(7));
    }

    #[test]
    fn test_flat_keys_are_not_split() {
        let request = RequestSnapshot::new().with_param("filter.name", "x");
        let spec = FieldSpec::new(Source::QueryParameter, "filter.name").expect("valid");
        assert_eq!(*spec.resolve(&request).expect("ok"), FieldValue::from("x"));
    }

    // === body paths ===

    #[test]
    fn test_body_required() {
        let request = RequestSnapshot::new();
        assert_eq!(
            body_spec("name").resolve(&request).unwrap_err(),
            ValidationError::MissingBody
        );
    }

    #[test]
    fn test_body_must_be_object() {
        let request = RequestSnapshot::new().with_json_body(json!([1, 2]));
        assert_eq!(
            body_spec("name").resolve(&request).unwrap_err(),
            ValidationError::NotJsonObject
        );
    }

    #[test]
    fn test_nested_lookup() {
        let request =
            RequestSnapshot::new().with_json_body(json!({"user": {"address": {"zip": "1000"}}}));
        let value = body_spec("user.address.zip").resolve(&request).expect("ok");
        assert_eq!(*value, FieldValue::from("1000"));

        let value = body_spec("user.address.city").resolve(&request).expect("ok");
        assert!(value.is_null());
    }

    #[test]
    fn test_missing_required_segment() {
        let request = RequestSnapshot::new().with_json_body(json!({"user": null}));
        assert_eq!(
            body_spec("user.name").resolve(&request).unwrap_err(),
            ValidationError::PathNotPresent {
                segment: "user".to_string()
            }
        );
    }

    #[test]
    fn test_scalar_intermediate_counts_as_missing() {
        let request = RequestSnapshot::new().with_json_body(json!({"user": "bob"}));
        assert!(matches!(
            body_spec("user.name").resolve(&request),
            Err(ValidationError::PathNotPresent { .. })
        ));
        assert!(body_spec("?user.name").resolve(&request).expect("ok").is_null());
    }

    #[test]
    fn test_optional_segments_substitute_empty_objects() {
        let request = RequestSnapshot::new().with_json_body(json!({}));
        let value = body_spec("?a.?b.c").resolve(&request).expect("ok");
        assert!(value.is_null());
    }

    #[test]
    fn test_required_segment_after_optional_one() {
        let request = RequestSnapshot::new().with_json_body(json!({}));
        assert_eq!(
            body_spec("?a.b.c").resolve(&request).unwrap_err(),
            ValidationError::PathNotPresent {
                segment: "b".to_string()
            }
        );
    }
}
