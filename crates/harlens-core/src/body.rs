//! Best-effort decoding of captured body text.
//!
//! A captured body is either valid JSON, some other text, or missing
//! entirely. Decoding never fails: anything that is not JSON is kept
//! verbatim as [`Body::Raw`].

use serde::{Serialize, Serializer};
use serde_json::Value;

/// Outcome of decoding a body
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Body {
    /// Text parsed as JSON
    Parsed(Value),
    /// Text that is not JSON, unchanged
    Raw(String),
    /// No body text was captured
    #[default]
    Absent,
}

impl Body {
    pub fn decode(text: Option<&str>) -> Self {
        match text {
            None => Body::Absent,
            Some(text) => match serde_json::from_str::<Value>(text) {
                Ok(value) => Body::Parsed(value),
                Err(e) => {
                    tracing::trace!("Body is not JSON, keeping raw text: {}", e);
                    Body::Raw(text.to_string())
                }
            },
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Body::Absent)
    }

    /// The decoded value when it is a JSON object
    pub fn as_object(&self) -> Option<&serde_json::Map<String, Value>> {
        match self {
            Body::Parsed(Value::Object(map)) => Some(map),
            _ => None,
        }
    }

    /// Multi-line rendering: 2-space indented JSON, or the raw text as-is
    pub fn to_pretty(&self) -> Option<String> {
        match self {
            Body::Parsed(value) => Some(pretty(value)),
            Body::Raw(text) => Some(text.clone()),
            Body::Absent => None,
        }
    }

    /// Single-line rendering; raw text is JSON-quoted so it never spans lines
    pub fn to_compact(&self) -> Option<String> {
        match self {
            Body::Parsed(value) => Some(value.to_string()),
            Body::Raw(text) => Some(Value::String(text.clone()).to_string()),
            Body::Absent => None,
        }
    }
}

impl Serialize for Body {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Body::Parsed(value) => value.serialize(serializer),
            Body::Raw(text) => serializer.serialize_str(text),
            Body::Absent => serializer.serialize_none(),
        }
    }
}

/// Pretty-print a JSON value with 2-space indentation
pub fn pretty(value: &Value) -> String {
    // Infallible for `Value`: map keys are always strings.
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// JavaScript truthiness: `null`, `false`, `0` and `""` are falsy
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// True when the object carries a truthy `operationName` or `query`
pub fn has_graphql_markers(map: &serde_json::Map<String, Value>) -> bool {
    ["operationName", "query"]
        .iter()
        .any(|key| map.get(*key).is_some_and(is_truthy))
}
