//! The request surface validators read from

use std::collections::HashMap;

use super::value::FieldValue;

/// Read-only view of an incoming request
///
/// Everything is already materialized; implementations must not block.
pub trait RequestView {
    /// Query string parameter
    fn parameter(&self, name: &str) -> Option<&str>;

    /// Url-encoded form parameter
    fn form_parameter(&self, name: &str) -> Option<&str>;

    /// Parsed body, if the request has one
    fn body(&self) -> Option<&FieldValue>;

    fn has_body(&self) -> bool {
        self.body().is_some()
    }

    /// Value attached to the request by an earlier pipeline stage
    fn context_attribute(&self, key: &str) -> Option<&FieldValue>;
}

/// Per-request attributes set by earlier middleware
///
/// Stored as a request extension; the validation middleware reads it from there.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextAttributes {
    values: HashMap<String, FieldValue>,
}

impl ContextAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// An owned snapshot of everything a validator can look at
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestSnapshot {
    params: HashMap<String, String>,
    form: HashMap<String, String>,
    body: Option<FieldValue>,
    context: ContextAttributes,
}

impl RequestSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params.extend(params);
        self
    }

    pub fn with_form_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.insert(name.into(), value.into());
        self
    }

    pub fn with_form(mut self, form: HashMap<String, String>) -> Self {
        self.form.extend(form);
        self
    }

    pub fn with_body(mut self, body: impl Into<FieldValue>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_json_body(self, body: serde_json::Value) -> Self {
        self.with_body(body)
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.context.insert(key, value);
        self
    }

    pub fn with_context_attributes(mut self, context: ContextAttributes) -> Self {
        self.context = context;
        self
    }
}

impl RequestView for RequestSnapshot {
    fn parameter(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    fn form_parameter(&self, name: &str) -> Option<&str> {
        self.form.get(name).map(String::as_str)
    }

    fn body(&self) -> Option<&FieldValue> {
        self.body.as_ref()
    }

    fn context_attribute(&self, key: &str) -> Option<&FieldValue> {
        self.context.get(key)
    }
}
