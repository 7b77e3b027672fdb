//! Request metadata shown alongside a report

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Methods whose body is worth showing
const BODY_METHODS: [&str; 3] = ["POST", "PUT", "PATCH"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestContext {
    pub path: String,
    pub method: String,
    /// Query string parameters; empty when the request had none
    pub params: BTreeMap<String, String>,
    /// Parsed JSON body, if the request carried a meaningful one
    pub body: Option<Value>,
    pub captured_at: Option<DateTime<Utc>>,
}

impl RequestContext {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Attach a raw body, keeping it only if [`RequestContext::parse_body`] accepts it
    pub fn with_raw_body(mut self, raw: &[u8]) -> Self {
        self.body = Self::parse_body(&self.method, raw);
        self
    }

    pub fn captured_at(mut self, at: DateTime<Utc>) -> Self {
        self.captured_at = Some(at);
        self
    }

    /// Decode a request body for display.
    ///
    /// Returns `None` for methods without a meaningful body, for bytes that are not
    /// UTF-8 JSON, and for empty JSON values (`null`, `false`, `0`, `""`, `[]`, `{}`).
    pub fn parse_body(method: &str, raw: &[u8]) -> Option<Value> {
        if !BODY_METHODS
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(method))
        {
            return None;
        }

        let text = std::str::from_utf8(raw).ok()?;
        let value: Value = serde_json::from_str(text).ok()?;
        if is_empty_value(&value) {
            None
        } else {
            Some(value)
        }
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}
