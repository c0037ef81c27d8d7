use super::{NormalizedRecord, Report, ReportOptions, ReportRenderer, cap_response};
use crate::Result;
use serde_json::Value;
use std::fmt::Write;

/// One line per call; bodies as single-line JSON
pub(super) struct CompactRenderer;

impl ReportRenderer for CompactRenderer {
    fn render(&self, report: &Report<'_>, options: &ReportOptions) -> Result<String> {
        let mut out = format!(
            "total={} graphql={} rest={}\n",
            report.summary.total, report.summary.graphql, report.summary.rest
        );

        for record in report.records {
            write_record(&mut out, record, options);
            out.push('\n');
        }

        Ok(out)
    }
}

fn write_record(out: &mut String, record: &NormalizedRecord, options: &ReportOptions) {
    let _ = write!(
        out,
        "#{} {} {} {} {} {}ms",
        record.ordinal,
        record.type_tag(),
        record.method,
        record.url,
        record.status_code,
        record.duration_ms
    );
    if record.is_graphql
        && let Some(name) = &record.operation_name
    {
        let _ = write!(out, " op={}", name);
    }

    if let Some(query) = record.graphql_query() {
        let _ = write!(out, " query={}", query);
        if let Some(variables) = record.graphql_variables() {
            let _ = write!(out, " vars={}", Value::Object(variables.clone()));
        }
    } else if let Some(text) = record.request_body.to_compact() {
        let _ = write!(out, " req={}", text);
    }

    if let Some(text) = record.response_body.to_compact() {
        let _ = write!(out, " res={}", cap_response(&text, options, ""));
    }
}
