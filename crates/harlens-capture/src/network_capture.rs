use crate::events::{CdpRequest, CdpResponse};
use chrono::{DateTime, SecondsFormat, Utc};
use harlens_core::har::{Content, Entry, Header, PostData, Request, Response};
use serde_json::{Map, Value, json};

pub const DEFAULT_MAX_RESPONSE_BODY_BYTES: usize = 65_536;
pub const DEFAULT_MAX_POST_DATA_BYTES: usize = 100_000;

/// Size caps applied to captured bodies before they become HAR entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureLimits {
    pub max_response_body_bytes: usize,
    pub max_post_data_bytes: usize,
}

impl Default for CaptureLimits {
    fn default() -> Self {
        Self {
            max_response_body_bytes: DEFAULT_MAX_RESPONSE_BODY_BYTES,
            max_post_data_bytes: DEFAULT_MAX_POST_DATA_BYTES,
        }
    }
}

/// Cut a string to at most `max_bytes`, backing off to a char boundary
pub fn truncate_utf8(text: &str, max_bytes: usize) -> String {
    if text.len() <= max_bytes {
        return text.to_string();
    }
    let mut cut = max_bytes;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    text[..cut].to_string()
}

/// Cut base64 text to at most `max_bytes`, keeping whole 4-character groups
pub fn truncate_base64(text: &str, max_bytes: usize) -> String {
    if text.len() <= max_bytes {
        return text.to_string();
    }
    let cut = max_bytes - max_bytes % 4;
    // base64 is ASCII, but a corrupt body should not panic on slicing.
    truncate_utf8(text, cut)
}

/// Captured response body
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CapturedBody {
    pub text: String,
    pub base64_encoded: bool,
    pub original_size: usize,
}

impl CapturedBody {
    pub fn new(body: String, base64_encoded: bool, max_bytes: usize) -> Self {
        let original_size = body.len();
        let text = if base64_encoded {
            truncate_base64(&body, max_bytes)
        } else {
            truncate_utf8(&body, max_bytes)
        };
        Self {
            text,
            base64_encoded,
            original_size,
        }
    }

    pub fn was_truncated(&self) -> bool {
        self.text.len() < self.original_size
    }
}

/// A request observed on the wire, with whatever has arrived for it so far
#[derive(Debug, Clone)]
pub(crate) struct NetworkRequest {
    pub seq: u64,
    pub started_at: DateTime<Utc>,
    pub start_timestamp: f64,
    pub request: CdpRequest,
    pub post_data_size: usize,
    pub response: Option<CdpResponse>,
    pub response_timestamp: Option<f64>,
    pub finished_timestamp: Option<f64>,
    pub encoded_data_length: Option<f64>,
    pub failure: Option<String>,
    pub body: Option<CapturedBody>,
}

impl NetworkRequest {
    pub fn new(
        seq: u64,
        started_at: DateTime<Utc>,
        start_timestamp: f64,
        mut request: CdpRequest,
        limits: &CaptureLimits,
    ) -> Self {
        let post_data_size = request.post_data.as_ref().map_or(0, String::len);
        request.post_data = request
            .post_data
            .map(|data| truncate_utf8(&data, limits.max_post_data_bytes));

        Self {
            seq,
            started_at,
            start_timestamp,
            request,
            post_data_size,
            response: None,
            response_timestamp: None,
            finished_timestamp: None,
            encoded_data_length: None,
            failure: None,
            body: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished_timestamp.is_some()
    }

    /// Total time in milliseconds from request to the last event seen
    pub fn duration_ms(&self) -> f64 {
        let end = self
            .finished_timestamp
            .or(self.response_timestamp)
            .unwrap_or(self.start_timestamp);
        ((end - self.start_timestamp) * 1000.0).max(0.0)
    }

    /// Build the HAR entry; `None` when nothing came back for the request
    pub fn into_entry(self) -> Option<Entry> {
        let time = self.duration_ms();
        let response = match (self.response, self.failure) {
            (Some(response), _) => build_response(response, self.body, self.encoded_data_length),
            (None, Some(error_text)) => failed_response(error_text),
            (None, None) => return None,
        };

        let headers = headers_from_map(&self.request.headers);
        let post_data = self.request.post_data.map(|text| {
            let mime_type = headers
                .iter()
                .find(|h| h.name.eq_ignore_ascii_case("content-type"))
                .map(|h| h.value.clone())
                .unwrap_or_default();
            PostData {
                mime_type,
                params: None,
                text: Some(text),
            }
        });

        Some(Entry {
            page_ref: None,
            started_date_time: self.started_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            time,
            request: Request {
                method: self.request.method,
                url: self.request.url,
                http_version: response.http_version.clone(),
                cookies: vec![],
                headers,
                query_string: vec![],
                post_data,
                headers_size: -1,
                body_size: self.post_data_size as i64,
                comment: None,
            },
            response,
            cache: json!({}),
            timings: json!({"send": 0, "wait": time, "receive": 0}),
            server_ip_address: None,
            connection: None,
            comment: None,
        })
    }
}

fn build_response(
    response: CdpResponse,
    body: Option<CapturedBody>,
    encoded_data_length: Option<f64>,
) -> Response {
    let content = match body {
        Some(body) => Content {
            size: body.original_size as i64,
            compression: None,
            mime_type: response.mime_type,
            comment: body
                .was_truncated()
                .then(|| format!("truncated from {} bytes", body.original_size)),
            encoding: body.base64_encoded.then(|| "base64".to_string()),
            text: Some(body.text),
        },
        None => Content {
            mime_type: response.mime_type,
            ..Content::default()
        },
    };

    Response {
        status: response.status,
        status_text: response.status_text,
        http_version: response
            .protocol
            .as_deref()
            .map(normalize_http_version)
            .unwrap_or_default(),
        cookies: vec![],
        headers: headers_from_map(&response.headers),
        content,
        redirect_url: String::new(),
        headers_size: -1,
        body_size: encoded_data_length.map_or(-1, |len| len.round() as i64),
        comment: None,
    }
}

fn failed_response(error_text: String) -> Response {
    Response {
        status: 0,
        status_text: error_text,
        http_version: String::new(),
        cookies: vec![],
        headers: vec![],
        content: Content::default(),
        redirect_url: String::new(),
        headers_size: -1,
        body_size: -1,
        comment: None,
    }
}

/// DevTools reports ALPN ids (`h2`, `http/1.1`); HAR wants `HTTP/x.y`
fn normalize_http_version(protocol: &str) -> String {
    match protocol.to_lowercase().as_str() {
        "h2" | "http/2" | "http/2.0" => "HTTP/2.0".to_string(),
        "h3" | "http/3" | "http/3.0" => "HTTP/3.0".to_string(),
        "http/1.0" => "HTTP/1.0".to_string(),
        "http/1.1" => "HTTP/1.1".to_string(),
        _ => protocol.to_string(),
    }
}

/// DevTools headers are a name -> value object; keep their order
pub(crate) fn headers_from_map(headers: &Map<String, Value>) -> Vec<Header> {
    headers
        .iter()
        .map(|(name, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Header::new(name.clone(), value)
        })
        .collect()
}
