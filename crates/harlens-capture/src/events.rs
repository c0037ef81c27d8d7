use crate::{Error, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

/// `Network.*` DevTools events the session understands
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureEvent {
    RequestWillBeSent(RequestWillBeSent),
    ResponseReceived(ResponseReceived),
    LoadingFinished(LoadingFinished),
    LoadingFailed(LoadingFailed),
    /// Result of `Network.getResponseBody`, tagged with its request id
    ResponseBody(ResponseBody),
}

impl CaptureEvent {
    /// Decode a protocol message by method name.
    ///
    /// Returns `Ok(None)` for methods that carry nothing the capture needs.
    pub fn from_message(method: &str, params: Value) -> Result<Option<Self>> {
        let malformed = |source| Error::Event {
            method: method.to_string(),
            source,
        };

        let event = match method {
            "Network.requestWillBeSent" => {
                CaptureEvent::RequestWillBeSent(serde_json::from_value(params).map_err(malformed)?)
            }
            "Network.responseReceived" => {
                CaptureEvent::ResponseReceived(serde_json::from_value(params).map_err(malformed)?)
            }
            "Network.loadingFinished" => {
                CaptureEvent::LoadingFinished(serde_json::from_value(params).map_err(malformed)?)
            }
            "Network.loadingFailed" => {
                CaptureEvent::LoadingFailed(serde_json::from_value(params).map_err(malformed)?)
            }
            "Network.getResponseBody" => {
                CaptureEvent::ResponseBody(serde_json::from_value(params).map_err(malformed)?)
            }
            _ => return Ok(None),
        };

        Ok(Some(event))
    }

    /// Decode one `{"method": ..., "params": ...}` JSON line
    pub fn from_json_line(line: &str) -> Result<Option<Self>> {
        #[derive(Deserialize)]
        struct Message {
            method: String,
            #[serde(default)]
            params: Value,
        }

        let message: Message = serde_json::from_str(line)?;
        Self::from_message(&message.method, message.params)
    }

    pub fn request_id(&self) -> &str {
        match self {
            CaptureEvent::RequestWillBeSent(e) => &e.request_id,
            CaptureEvent::ResponseReceived(e) => &e.request_id,
            CaptureEvent::LoadingFinished(e) => &e.request_id,
            CaptureEvent::LoadingFailed(e) => &e.request_id,
            CaptureEvent::ResponseBody(e) => &e.request_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestWillBeSent {
    pub request_id: String,
    /// Monotonic seconds
    pub timestamp: f64,
    /// Seconds since the Unix epoch
    #[serde(default)]
    pub wall_time: Option<f64>,
    pub request: CdpRequest,
    #[serde(default)]
    pub redirect_response: Option<CdpResponse>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CdpRequest {
    pub url: String,
    pub method: String,
    #[serde(default)]
    pub headers: Map<String, Value>,
    #[serde(default)]
    pub post_data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CdpResponse {
    pub status: i64,
    #[serde(default)]
    pub status_text: String,
    #[serde(default)]
    pub headers: Map<String, Value>,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub protocol: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseReceived {
    pub request_id: String,
    pub timestamp: f64,
    pub response: CdpResponse,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingFinished {
    pub request_id: String,
    pub timestamp: f64,
    /// Bytes received over the wire, headers excluded
    #[serde(default)]
    pub encoded_data_length: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingFailed {
    pub request_id: String,
    pub timestamp: f64,
    #[serde(default)]
    pub error_text: String,
    #[serde(default)]
    pub canceled: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    pub request_id: String,
    pub body: String,
    #[serde(default)]
    pub base64_encoded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request_will_be_sent() {
        let line = r#"{"method":"Network.requestWillBeSent","params":{
            "requestId":"42.1","timestamp":100.5,"wallTime":1700000000.25,
            "request":{"url":"https://api.example.com/graphql","method":"POST",
                "headers":{"Content-Type":"application/json"},
                "postData":"{\"query\":\"{ me { id } }\"}"},
            "type":"Fetch"}}"#;

        let event = CaptureEvent::from_json_line(line).unwrap().unwrap();
        let CaptureEvent::RequestWillBeSent(sent) = event else {
            panic!("unexpected event");
        };
        assert_eq!(sent.request_id, "42.1");
        assert_eq!(sent.wall_time, Some(1700000000.25));
        assert_eq!(sent.request.method, "POST");
        assert_eq!(sent.request.post_data.as_deref(), Some(r#"{"query":"{ me { id } }"}"#));
        assert!(sent.redirect_response.is_none());
    }

    #[test]
    fn test_unknown_method_is_skipped() {
        let line = r#"{"method":"Page.frameNavigated","params":{"frame":{}}}"#;
        assert!(CaptureEvent::from_json_line(line).unwrap().is_none());
    }

    #[test]
    fn test_malformed_params_name_the_method() {
        let line = r#"{"method":"Network.loadingFinished","params":{"timestamp":1}}"#;
        let err = CaptureEvent::from_json_line(line).unwrap_err();
        assert!(err.to_string().contains("Network.loadingFinished"));
    }

    #[test]
    fn test_not_json() {
        assert!(matches!(
            CaptureEvent::from_json_line("nope"),
            Err(Error::Message(_))
        ));
    }
}
