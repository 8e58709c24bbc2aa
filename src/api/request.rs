//! API request envelope
//!
//! The inbound HTTP-like request shape: method, path, optional path
//! parameters, optional body.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Inbound request envelope.
///
/// Deserializes from the camelCase JSON wire shape. A string body is parsed
/// as JSON on the way in; parse failure leaves the raw string in place, so
/// handlers reject it as non-object.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequest {
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub path_parameters: HashMap<String, String>,
    #[serde(default, deserialize_with = "deserialize_body")]
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Build a request programmatically (tests and embedding callers).
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            path_parameters: HashMap::new(),
            body: None,
        }
    }

    /// Attach a body. Strings get the same parse-or-keep-raw treatment as
    /// the wire path.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(normalize_body(body));
        self
    }

    pub fn with_path_parameter(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.path_parameters.insert(key.into(), value.into());
        self
    }

    /// Parse a request from its JSON envelope.
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn deserialize_body<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.map(normalize_body))
}

fn normalize_body(raw: Value) -> Value {
    match raw {
        Value::String(text) => serde_json::from_str(&text).unwrap_or(Value::String(text)),
        other => other,
    }
}
