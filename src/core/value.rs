//! Dynamically shaped values produced by field resolution

use indexmap::IndexMap;

use super::number::Number;

/// A resolved field value
///
/// One closed variant per shape a request can carry, so every predicate has to
/// decide explicitly what it does with each of them.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    #[default]
    Null,
    Boolean(bool),
    Number(Number),
    String(String),
    Array(Vec<FieldValue>),
    Object(IndexMap<String, FieldValue>),
}

/// Shared `null` handed out for absent fields
pub(crate) static NULL: FieldValue = FieldValue::Null;

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            FieldValue::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, FieldValue>> {
        match self {
            FieldValue::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key when `self` is an object
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Short shape name, used in log output
    pub fn shape(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Boolean(_) => "boolean",
            FieldValue::Number(_) => "number",
            FieldValue::String(_) => "string",
            FieldValue::Array(_) => "array",
            FieldValue::Object(_) => "object",
        }
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Bool(b) => FieldValue::Boolean(b),
            serde_json::Value::Number(n) => FieldValue::Number(Number::from(&n)),
            serde_json::Value::String(s) => FieldValue::String(s),
            serde_json::Value::Array(items) => {
                FieldValue::Array(items.into_iter().map(FieldValue::from).collect())
            }
            serde_json::Value::Object(map) => FieldValue::Object(
                map.into_iter()
                    .map(|(k, v)| (k, FieldValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Boolean(b)
    }
}

impl From<Number> for FieldValue {
    fn from(n: Number) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Number(Number::Integer(v))
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Number(Number::Long(v))
    }
}

impl From<f32> for FieldValue {
    fn from(v: f32) -> Self {
        FieldValue::Number(Number::Float(v))
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Number(Number::Double(v))
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(items: Vec<T>) -> Self {
        FieldValue::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_object_keeps_order_and_shapes() {
        let value = FieldValue::from(json!({
            "name": "widget",
            "count": 3,
            "big": 10_000_000_000i64,
            "ratio": 0.5,
            "tags": ["a", "b"],
            "active": true,
            "missing": null
        }));

        let map = value.as_object().expect("object");
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["name", "count", "big", "ratio", "tags", "active", "missing"]
        );
        assert_eq!(value.get("name"), Some(&FieldValue::from("widget")));
        assert_eq!(value.get("count"), Some(&FieldValue::from(3)));
        assert_eq!(value.get("big"), Some(&FieldValue::from(10_000_000_000i64)));
        assert_eq!(value.get("ratio"), Some(&FieldValue::from(0.5)));
        assert_eq!(value.get("tags"), Some(&FieldValue::from(vec!["a", "b"])));
        assert_eq!(value.get("active"), Some(&FieldValue::Boolean(true)));
        assert_eq!(value.get("missing"), Some(&FieldValue::Null));
    }

    #[test]
    fn test_parsed_body_keeps_document_order() {
        let parsed: serde_json::Value =
            serde_json::from_str(r#"{"zeta": 1, "alpha": {"b": 2, "a": 3}}"#).unwrap();
        let value = FieldValue::from(parsed);

        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);

        let nested: Vec<&str> = value
            .get("alpha")
            .and_then(FieldValue::as_object)
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(nested, vec!["b", "a"]);
    }

    #[test]
    fn test_get_on_non_object_is_none() {
        assert_eq!(FieldValue::from("text").get("x"), None);
        assert_eq!(FieldValue::Null.get("x"), None);
    }

    #[test]
    fn test_option_conversion() {
        assert!(FieldValue::from(None::<i32>).is_null());
        assert_eq!(FieldValue::from(Some("x")), FieldValue::from("x"));
    }
}
