//! Classification of HAR entries as JSON and GraphQL API calls.
//!
//! Content types are sniffed by substring so that parameters such as
//! `; charset=utf-8` and vendor types like `application/vnd.api+json` still
//! count. Header names compare case-insensitively.

use crate::body::has_graphql_markers;
use crate::har::{Entry, Har, Log};
use serde_json::Value;

const JSON_MARKER: &str = "json";

/// True when the request body MIME type, or failing that the first
/// `Content-Type` request header, mentions JSON
pub fn is_json_request(entry: &Entry) -> bool {
    let content_type = entry
        .request
        .body_mime_type()
        .or_else(|| entry.request.header("content-type"))
        .unwrap_or("");
    content_type.contains(JSON_MARKER)
}

/// True when the response body MIME type mentions JSON
pub fn is_json_response(entry: &Entry) -> bool {
    entry
        .response
        .body_mime_type()
        .is_some_and(|mime| mime.contains(JSON_MARKER))
}

/// True when a JSON request body is an object naming a GraphQL operation or query
pub fn is_graphql_request(entry: &Entry) -> bool {
    if !is_json_request(entry) {
        return false;
    }

    let Some(text) = entry.request.body_text() else {
        return false;
    };

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => has_graphql_markers(&map),
        Ok(_) => false,
        Err(e) => {
            tracing::debug!(
                "Request body for {} is not JSON: {}",
                entry.request.url,
                e
            );
            false
        }
    }
}

/// An entry is an API call when either side is JSON and a response body was captured
pub fn is_api_entry(entry: &Entry) -> bool {
    (is_json_request(entry) || is_json_response(entry)) && entry.response.body_text().is_some()
}

/// Keep the API calls, in their original order
pub fn filter_entries(entries: &[Entry]) -> Vec<&Entry> {
    select_entries(entries, EntrySelection::Api)
}

/// Which entries make it into a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EntrySelection {
    /// JSON request or response with a captured response body
    #[default]
    Api,
    /// API calls whose request is a GraphQL operation
    Graphql,
    /// Every entry, classified or not
    All,
}

impl EntrySelection {
    pub fn matches(&self, entry: &Entry) -> bool {
        match self {
            EntrySelection::Api => is_api_entry(entry),
            EntrySelection::Graphql => is_api_entry(entry) && is_graphql_request(entry),
            EntrySelection::All => true,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntrySelection::Api => "json api calls",
            EntrySelection::Graphql => "graphql operations",
            EntrySelection::All => "all entries",
        }
    }
}

/// Apply a selection, preserving order
pub fn select_entries(entries: &[Entry], selection: EntrySelection) -> Vec<&Entry> {
    let selected: Vec<&Entry> = entries.iter().filter(|e| selection.matches(e)).collect();

    tracing::debug!(
        "Selected {} of {} entries ({})",
        selected.len(),
        entries.len(),
        selection.as_str()
    );

    selected
}

/// Filter a HAR file down to the selected entries
///
/// Returns a new HAR with only matching entries. Preserves all log metadata
/// (creator, browser, pages). Returns an error if nothing matches.
pub fn filter_har(har: &Har, selection: EntrySelection) -> crate::Result<Har> {
    let entries: Vec<Entry> = select_entries(&har.log.entries, selection)
        .into_iter()
        .cloned()
        .collect();

    if entries.is_empty() {
        return Err(crate::Error::NoMatches(selection.as_str().to_string()));
    }

    Ok(Har {
        log: Log {
            version: har.log.version.clone(),
            creator: har.log.creator.clone(),
            browser: har.log.browser.clone(),
            pages: har.log.pages.clone(),
            entries,
            comment: har.log.comment.clone(),
        },
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::har::{Content, Header, PostData, Request, Response};

    pub(crate) fn create_test_entry(
        url: &str,
        method: &str,
        request_content_type: Option<&str>,
        request_body: Option<&str>,
        response_content_type: Option<&str>,
        response_body: Option<&str>,
    ) -> Entry {
        let mut request_headers = vec![];
        if let Some(ct) = request_content_type {
            request_headers.push(Header::new("Content-Type", ct));
        }

        Entry {
            page_ref: None,
            started_date_time: "2024-01-01T00:00:00.000Z".to_string(),
            time: 100.0,
            request: Request {
                method: method.to_string(),
                url: url.to_string(),
                http_version: "HTTP/1.1".to_string(),
                headers: request_headers,
                query_string: vec![],
                cookies: vec![],
                headers_size: -1,
                body_size: -1,
                post_data: request_body.map(|body| PostData {
                    mime_type: request_content_type.unwrap_or("").to_string(),
                    params: None,
                    text: Some(body.to_string()),
                }),
                comment: None,
            },
            response: Response {
                status: 200,
                status_text: "OK".to_string(),
                http_version: "HTTP/1.1".to_string(),
                headers: vec![],
                cookies: vec![],
                content: Content {
                    mime_type: response_content_type.unwrap_or("").to_string(),
                    text: response_body.map(|s| s.to_string()),
                    ..Content::default()
                },
                redirect_url: String::new(),
                headers_size: -1,
                body_size: -1,
                comment: None,
            },
            cache: Value::Object(Default::default()),
            timings: Value::Object(Default::default()),
            server_ip_address: None,
            connection: None,
            comment: None,
        }
    }

    fn har_of(entries: Vec<Entry>) -> Har {
        Har {
            log: Log::new(entries),
        }
    }

    #[test]
    fn test_json_request_content_type_variants() {
        for (ct, expected) in [
            ("application/json", true),
            ("application/json; charset=utf-8", true),
            ("application/ld+json", true),
            ("application/vnd.api+json", true),
            ("text/html", false),
            ("application/JSON", false),
        ] {
            let entry = create_test_entry("https://a.example/", "POST", Some(ct), Some("{}"), None, None);
            assert_eq!(is_json_request(&entry), expected, "content type {ct}");
        }
    }

    #[test]
    fn test_json_request_falls_back_to_header() {
        let mut entry = create_test_entry("https://a.example/", "GET", None, None, None, None);
        entry.request.headers.push(Header::new("content-TYPE", "application/json"));
        entry.request.headers.push(Header::new("Content-Type", "text/plain"));
        assert!(is_json_request(&entry));
    }

    #[test]
    fn test_json_request_prefers_body_mime_type() {
        let mut entry = create_test_entry("https://a.example/", "POST", None, None, None, None);
        entry.request.post_data = Some(PostData {
            mime_type: "text/plain".to_string(),
            params: None,
            text: Some("{}".to_string()),
        });
        entry.request.headers.push(Header::new("Content-Type", "application/json"));
        assert!(!is_json_request(&entry));
    }

    #[test]
    fn test_json_request_without_any_type() {
        let entry = create_test_entry("https://a.example/", "GET", None, None, None, None);
        assert!(!is_json_request(&entry));
    }

    #[test]
    fn test_json_response() {
        let json = create_test_entry("https://a.example/", "GET", None, None, Some("application/json"), Some("{}"));
        let html = create_test_entry("https://a.example/", "GET", None, None, Some("text/html"), Some("<p>"));
        let none = create_test_entry("https://a.example/", "GET", None, None, None, Some("{}"));
        assert!(is_json_response(&json));
        assert!(!is_json_response(&html));
        assert!(!is_json_response(&none));
    }

    #[test]
    fn test_graphql_requires_json_request() {
        let entry = create_test_entry(
            "https://a.example/graphql",
            "POST",
            Some("text/plain"),
            Some(r#"{"query":"{ me { id } }"}"#),
            Some("application/json"),
            Some("{}"),
        );
        assert!(!is_graphql_request(&entry));
    }

    #[test]
    fn test_graphql_detection() {
        let query = create_test_entry(
            "https://a.example/graphql",
            "POST",
            Some("application/json"),
            Some(r#"{"query":"{ me { id } }"}"#),
            None,
            None,
        );
        let named = create_test_entry(
            "https://a.example/graphql",
            "POST",
            Some("application/json"),
            Some(r#"{"operationName":"Me","extensions":{}}"#),
            None,
            None,
        );
        let rest = create_test_entry(
            "https://a.example/users",
            "POST",
            Some("application/json"),
            Some(r#"{"name":"x"}"#),
            None,
            None,
        );
        let broken = create_test_entry(
            "https://a.example/graphql",
            "POST",
            Some("application/json"),
            Some("query {"),
            None,
            None,
        );
        let batch = create_test_entry(
            "https://a.example/graphql",
            "POST",
            Some("application/json"),
            Some(r#"[{"query":"{ me { id } }"}]"#),
            None,
            None,
        );
        let no_body = create_test_entry("https://a.example/graphql", "POST", Some("application/json"), None, None, None);

        assert!(is_graphql_request(&query));
        assert!(is_graphql_request(&named));
        assert!(!is_graphql_request(&rest));
        assert!(!is_graphql_request(&broken));
        assert!(!is_graphql_request(&batch));
        assert!(!is_graphql_request(&no_body));
    }

    #[test]
    fn test_filter_entries_keeps_order_and_requires_response_body() {
        let entries = vec![
            create_test_entry("https://a.example/1", "GET", None, None, Some("application/json"), Some("{}")),
            create_test_entry("https://a.example/2", "GET", None, None, Some("text/html"), Some("<p>")),
            create_test_entry("https://a.example/3", "GET", None, None, Some("application/json"), None),
            create_test_entry("https://a.example/4", "POST", Some("application/json"), Some("{}"), Some("text/plain"), Some("")),
            create_test_entry("https://a.example/5", "GET", None, None, Some("application/problem+json"), Some("{}")),
        ];

        let kept: Vec<&str> = filter_entries(&entries)
            .iter()
            .map(|e| e.request.url.as_str())
            .collect();

        assert_eq!(
            kept,
            vec!["https://a.example/1", "https://a.example/4", "https://a.example/5"]
        );
    }

    #[test]
    fn test_select_graphql_and_all() {
        let entries = vec![
            create_test_entry("https://a.example/users", "GET", None, None, Some("application/json"), Some("[]")),
            create_test_entry(
                "https://a.example/graphql",
                "POST",
                Some("application/json"),
                Some(r#"{"query":"{ me { id } }"}"#),
                Some("application/json"),
                Some("{}"),
            ),
            create_test_entry("https://a.example/app.js", "GET", None, None, Some("text/javascript"), None),
        ];

        assert_eq!(select_entries(&entries, EntrySelection::Graphql).len(), 1);
        assert_eq!(select_entries(&entries, EntrySelection::All).len(), 3);
    }

    #[test]
    fn test_filter_har_preserves_metadata() {
        let mut har = har_of(vec![
            create_test_entry("https://a.example/users", "GET", None, None, Some("application/json"), Some("[]")),
            create_test_entry("https://a.example/", "GET", None, None, Some("text/html"), Some("<p>")),
        ]);
        har.log.comment = Some("recorded".to_string());

        let filtered = filter_har(&har, EntrySelection::Api).unwrap();
        assert_eq!(filtered.log.entries.len(), 1);
        assert_eq!(filtered.log.comment.as_deref(), Some("recorded"));
        assert_eq!(filtered.log.creator.name, "harlens");
    }

    #[test]
    fn test_filter_har_no_matches() {
        let har = har_of(vec![create_test_entry(
            "https://a.example/",
            "GET",
            None,
            None,
            Some("text/html"),
            Some("<p>"),
        )]);

        let err = filter_har(&har, EntrySelection::Api).unwrap_err();
        assert!(err.to_string().contains("No entries matched"));
    }
}
