use super::{NormalizedRecord, Report, ReportOptions, ReportRenderer, cap_response};
use crate::Result;
use crate::body::pretty;
use serde_json::Value;
use std::fmt::Write;

pub(super) struct TaggedRenderer;

impl ReportRenderer for TaggedRenderer {
    fn render(&self, report: &Report<'_>, options: &ReportOptions) -> Result<String> {
        let mut out = format!(
            "API CALLS total={} graphql={} rest={}\n",
            report.summary.total, report.summary.graphql, report.summary.rest
        );

        for record in report.records {
            out.push('\n');
            write_record(&mut out, record, options);
        }

        Ok(out)
    }
}

fn write_record(out: &mut String, record: &NormalizedRecord, options: &ReportOptions) {
    let _ = writeln!(
        out,
        "<call id=\"{}\" type=\"{}\">",
        record.ordinal,
        record.type_tag()
    );
    let _ = writeln!(out, "{} {}", record.method, record.url);
    let _ = writeln!(
        out,
        "status={} duration={}ms",
        record.status_code, record.duration_ms
    );
    if record.is_graphql
        && let Some(name) = &record.operation_name
    {
        let _ = writeln!(out, "operation={}", name);
    }

    if let Some(query) = record.graphql_query() {
        let text = match query {
            Value::String(s) => s.clone(),
            other => pretty(other),
        };
        write_block(out, "query", &text);
        if let Some(variables) = record.graphql_variables() {
            write_block(out, "variables", &pretty(&Value::Object(variables.clone())));
        }
    } else if let Some(text) = record.request_body.to_pretty() {
        write_block(out, "request", &text);
    }

    if let Some(text) = record.response_body.to_pretty() {
        write_block(out, "response", &cap_response(&text, options, "\n"));
    }

    out.push_str("</call>\n");
}

fn write_block(out: &mut String, tag: &str, body: &str) {
    let _ = writeln!(out, "<{}>\n{}\n</{}>", tag, body, tag);
}

#[cfg(test)]
mod tests {
    use super::super::tests::{graphql_entry, rest_entry};
    use super::super::{ReportOptions, normalize, render};
    use crate::filter::tests::create_test_entry;

    #[test]
    fn test_rest_unit() {
        let records = normalize(&[rest_entry()]);
        let out = render(&records, &ReportOptions::default()).unwrap();

        assert_eq!(
            out,
            "API CALLS total=1 graphql=0 rest=1\n\
             \n\
             <call id=\"1\" type=\"rest\">\n\
             GET https://api.example.com/users\n\
             status=200 duration=150ms\n\
             <response>\n\
             {\n  \"users\": []\n}\n\
             </response>\n\
             </call>\n"
        );
    }

    #[test]
    fn test_graphql_query_without_empty_variables() {
        let records = normalize(&[graphql_entry(
            r#"{"operationName":"GetUsers","query":"query GetUsers { users { id } }","variables":{}}"#,
        )]);
        let out = render(&records, &ReportOptions::default()).unwrap();

        assert!(out.contains("<call id=\"1\" type=\"graphql\">"));
        assert!(out.contains("operation=GetUsers\n"));
        assert!(out.contains("<query>\nquery GetUsers { users { id } }\n</query>"));
        assert!(!out.contains("<variables>"));
        assert!(!out.contains("<request>"));
    }

    #[test]
    fn test_graphql_variables_block() {
        let records = normalize(&[graphql_entry(
            r#"{"operationName":"GetUser","query":"query GetUser($id: ID!) { user(id: $id) { id } }","variables":{"id":"123"}}"#,
        )]);
        let out = render(&records, &ReportOptions::default()).unwrap();

        assert!(out.contains("<variables>\n{\n  \"id\": \"123\"\n}\n</variables>"));
    }

    #[test]
    fn test_persisted_query_renders_request_body() {
        let records = normalize(&[graphql_entry(
            r#"{"operationName":"Feed","extensions":{"persistedQuery":{"version":1}}}"#,
        )]);
        let out = render(&records, &ReportOptions::default()).unwrap();

        assert!(out.contains("operation=Feed"));
        assert!(!out.contains("<query>"));
        assert!(out.contains("<request>\n{\n  \"operationName\": \"Feed\","));
    }

    #[test]
    fn test_mixed_summary_and_ordinals() {
        let records = normalize(&[
            rest_entry(),
            graphql_entry(r#"{"query":"{ me { id } }"}"#),
        ]);
        let out = render(&records, &ReportOptions::default()).unwrap();

        assert!(out.starts_with("API CALLS total=2 graphql=1 rest=1\n"));
        let first = out.find("<call id=\"1\" type=\"rest\">").unwrap();
        let second = out.find("<call id=\"2\" type=\"graphql\">").unwrap();
        assert!(first < second);
        assert!(!out.contains("operation="));
    }

    #[test]
    fn test_raw_request_body() {
        let entry = create_test_entry(
            "https://api.example.com/form",
            "POST",
            Some("application/json"),
            Some("not valid json"),
            Some("application/json"),
            Some("{}"),
        );
        let out = render(&normalize(&[entry]), &ReportOptions::default()).unwrap();

        assert!(out.contains("<request>\nnot valid json\n</request>"));
        assert!(out.contains("type=\"rest\""));
    }

    #[test]
    fn test_response_truncation() {
        let long = create_test_entry(
            "https://api.example.com/blob",
            "GET",
            None,
            None,
            Some("application/json"),
            Some("x".repeat(1001).as_str()),
        );
        let short = create_test_entry(
            "https://api.example.com/blob",
            "GET",
            None,
            None,
            Some("application/json"),
            Some("y".repeat(999).as_str()),
        );
        let out = render(&normalize(&[long, short]), &ReportOptions::default()).unwrap();

        assert!(out.contains(&format!("<response>\n{}\n... [truncated]\n</response>", "x".repeat(1000))));
        assert!(out.contains(&format!("<response>\n{}\n</response>", "y".repeat(999))));
    }

    #[test]
    fn test_entry_without_bodies() {
        let entry = create_test_entry("https://api.example.com/ping", "HEAD", None, None, None, None);
        let out = render(&normalize(&[entry]), &ReportOptions::default()).unwrap();

        assert!(out.ends_with("status=200 duration=100ms\n</call>\n"));
    }

    #[test]
    fn test_empty_report() {
        let out = render(&[], &ReportOptions::default()).unwrap();
        assert_eq!(out, "API CALLS total=0 graphql=0 rest=0\n");
    }
}
