use super::{NormalizedRecord, Report, ReportOptions, ReportRenderer, cap_response};
use crate::Result;
use crate::body::{Body, pretty};
use serde_json::Value;
use std::fmt::Write;

pub(super) struct MarkdownRenderer;

impl ReportRenderer for MarkdownRenderer {
    fn render(&self, report: &Report<'_>, options: &ReportOptions) -> Result<String> {
        let mut out = String::from("# API Calls\n\n");
        let _ = writeln!(
            out,
            "**Total:** {} | **GraphQL:** {} | **REST:** {}",
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
    let kind = if record.is_graphql { "GraphQL" } else { "REST" };
    let _ = writeln!(out, "## {}. {}\n", record.ordinal, kind);
    let _ = writeln!(out, "- `{} {}`", record.method, record.url);
    let _ = writeln!(
        out,
        "- Status: {} | Duration: {}ms",
        record.status_code, record.duration_ms
    );
    if record.is_graphql
        && let Some(name) = &record.operation_name
    {
        let _ = writeln!(out, "- Operation: `{}`", name);
    }

    if let Some(query) = record.graphql_query() {
        match query {
            Value::String(text) => write_section(out, "Query", "graphql", text),
            other => write_section(out, "Query", "json", &pretty(other)),
        }
        if let Some(variables) = record.graphql_variables() {
            write_section(out, "Variables", "json", &pretty(&Value::Object(variables.clone())));
        }
    } else if let Some(text) = record.request_body.to_pretty() {
        write_section(out, "Request Body", fence_lang(&record.request_body), &text);
    }

    if let Some(text) = record.response_body.to_pretty() {
        write_section(
            out,
            "Response",
            fence_lang(&record.response_body),
            &cap_response(&text, options, "\n"),
        );
    }
}

fn write_section(out: &mut String, title: &str, lang: &str, body: &str) {
    let fence = fence_for(body);
    let _ = write!(out, "\n### {}\n\n{}{}\n{}\n{}\n", title, fence, lang, body, fence);
}

/// A backtick fence longer than any backtick run inside `body`, at least three long
fn fence_for(body: &str) -> String {
    let longest_run = body
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat((longest_run + 1).max(3))
}

fn fence_lang(body: &Body) -> &'static str {
    match body {
        Body::Parsed(_) => "json",
        _ => "text",
    }
}
