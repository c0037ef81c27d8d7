use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level HAR object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Har {
    pub log: Log,
}

/// Main HAR log object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Log {
    pub version: String,
    pub creator: Creator,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser: Option<Creator>,
    /// Page records are not interpreted, only carried through on rewrite.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<Value>,
    pub entries: Vec<Entry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Log {
    /// Empty log stamped with this crate as creator
    pub fn new(entries: Vec<Entry>) -> Self {
        Self {
            version: "1.2".to_string(),
            creator: Creator {
                name: "harlens".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                comment: None,
            },
            browser: None,
            pages: None,
            entries,
            comment: None,
        }
    }
}

/// Creator/Browser information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Creator {
    pub name: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// One captured HTTP exchange.
///
/// Capture tools disagree about which optional HAR fields they fill in, so
/// everything the classifier and formatter do not read is defaulted on
/// deserialization. `cache` and `timings` are kept as raw JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    #[serde(rename = "pageref", skip_serializing_if = "Option::is_none")]
    pub page_ref: Option<String>,
    #[serde(rename = "startedDateTime")]
    pub started_date_time: String,
    pub time: f64,
    pub request: Request,
    pub response: Response,
    #[serde(default = "empty_object")]
    pub cache: Value,
    #[serde(default = "empty_object")]
    pub timings: Value,
    #[serde(rename = "serverIPAddress", skip_serializing_if = "Option::is_none")]
    pub server_ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

fn unknown_size() -> i64 {
    -1
}

/// HTTP request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub method: String,
    pub url: String,
    #[serde(rename = "httpVersion", default)]
    pub http_version: String,
    #[serde(default)]
    pub cookies: Vec<Cookie>,
    #[serde(default)]
    pub headers: Vec<Header>,
    #[serde(rename = "queryString", default)]
    pub query_string: Vec<QueryParam>,
    #[serde(rename = "postData", skip_serializing_if = "Option::is_none")]
    pub post_data: Option<PostData>,
    #[serde(rename = "headersSize", default = "unknown_size")]
    pub headers_size: i64,
    #[serde(rename = "bodySize", default = "unknown_size")]
    pub body_size: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Request {
    /// Value of the first header whose name matches case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    pub fn body_text(&self) -> Option<&str> {
        self.post_data.as_ref().and_then(|p| p.text.as_deref())
    }

    /// Declared MIME type of the request body, `None` when missing or empty
    pub fn body_mime_type(&self) -> Option<&str> {
        self.post_data
            .as_ref()
            .map(|p| p.mime_type.as_str())
            .filter(|m| !m.is_empty())
    }
}

/// HTTP response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub status: i64,
    #[serde(rename = "statusText", default)]
    pub status_text: String,
    #[serde(rename = "httpVersion", default)]
    pub http_version: String,
    #[serde(default)]
    pub cookies: Vec<Cookie>,
    #[serde(default)]
    pub headers: Vec<Header>,
    #[serde(default)]
    pub content: Content,
    #[serde(rename = "redirectURL", default)]
    pub redirect_url: String,
    #[serde(rename = "headersSize", default = "unknown_size")]
    pub headers_size: i64,
    #[serde(rename = "bodySize", default = "unknown_size")]
    pub body_size: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Response {
    pub fn body_text(&self) -> Option<&str> {
        self.content.text.as_deref()
    }

    pub fn body_mime_type(&self) -> Option<&str> {
        Some(self.content.mime_type.as_str()).filter(|m| !m.is_empty())
    }
}

/// Cookie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,
    #[serde(rename = "httpOnly", skip_serializing_if = "Option::is_none")]
    pub http_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
}

/// HTTP header
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Query parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryParam {
    pub name: String,
    pub value: String,
}

/// Request body as recorded by the capture tool
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostData {
    #[serde(rename = "mimeType", default)]
    pub mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Response content
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub size: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression: Option<i64>,
    #[serde(rename = "mimeType", default)]
    pub mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}
