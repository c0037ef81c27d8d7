use crate::body::{Body, has_graphql_markers};
use crate::har::Entry;
use serde::Serialize;
use serde_json::{Map, Value};

/// Flat view of one API call, ready for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    /// 1-based position among the selected entries
    pub ordinal: usize,
    pub timestamp: String,
    pub duration_ms: u64,
    pub method: String,
    pub url: String,
    pub status_code: i64,
    #[serde(skip_serializing_if = "Body::is_absent")]
    pub request_body: Body,
    #[serde(skip_serializing_if = "Body::is_absent")]
    pub response_body: Body,
    pub is_graphql: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

impl NormalizedRecord {
    /// The `query` member of a GraphQL request body, unless missing or null
    pub fn graphql_query(&self) -> Option<&Value> {
        if !self.is_graphql {
            return None;
        }
        self.request_body
            .as_object()
            .and_then(|map| map.get("query"))
            .filter(|q| !q.is_null())
    }

    /// The `variables` object of a GraphQL request body when it has any keys
    pub fn graphql_variables(&self) -> Option<&Map<String, Value>> {
        self.request_body
            .as_object()
            .and_then(|map| map.get("variables"))
            .and_then(Value::as_object)
            .filter(|vars| !vars.is_empty())
    }

    pub fn type_tag(&self) -> &'static str {
        if self.is_graphql { "graphql" } else { "rest" }
    }
}

/// Normalize one entry; `index` is its 0-based position in the selected sequence
pub fn to_record(entry: &Entry, index: usize) -> NormalizedRecord {
    let request_body = Body::decode(entry.request.body_text());
    let response_body = Body::decode(entry.response.body_text());

    let (is_graphql, operation_name) = match request_body.as_object() {
        Some(map) => (
            has_graphql_markers(map),
            map.get("operationName").and_then(operation_name_of),
        ),
        None => (false, None),
    };

    NormalizedRecord {
        ordinal: index + 1,
        timestamp: entry.started_date_time.clone(),
        duration_ms: round_half_up(entry.time),
        method: entry.request.method.clone(),
        url: entry.request.url.clone(),
        status_code: entry.response.status,
        request_body,
        response_body,
        is_graphql,
        operation_name,
    }
}

/// Normalize a selected sequence, numbering from 1 in the given order
pub fn normalize<'a, I>(entries: I) -> Vec<NormalizedRecord>
where
    I: IntoIterator<Item = &'a Entry>,
{
    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| to_record(entry, index))
        .collect()
}

fn operation_name_of(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn round_half_up(ms: f64) -> u64 {
    (ms + 0.5).floor().max(0.0) as u64
}
