//! Rendering of normalized API calls into a single text report.
//!
//! Every format starts with a summary (total, GraphQL and REST counts) and
//! then emits one unit per record in ordinal order. Output depends only on
//! the records and [`ReportOptions`], so the same input always renders to
//! the same bytes.

mod compact;
mod markdown;
mod record;
mod tagged;

pub use record::{NormalizedRecord, normalize, to_record};

use crate::filter::{EntrySelection, select_entries};
use crate::har::Entry;
use crate::{Error, Result};
use serde::Serialize;

/// Response bodies longer than this many characters are cut in text reports
pub const DEFAULT_MAX_RESPONSE_CHARS: usize = 1000;
pub const DEFAULT_TRUNCATION_MARKER: &str = "... [truncated]";

/// Available report layouts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// Terse tag-delimited blocks
    #[default]
    Tagged,
    /// Headings and fenced code blocks
    Markdown,
    /// One line per call
    Compact,
    /// Machine-readable JSON document
    Json,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Tagged => "tagged",
            ReportFormat::Markdown => "markdown",
            ReportFormat::Compact => "compact",
            ReportFormat::Json => "json",
        }
    }

    fn renderer(&self) -> &'static dyn ReportRenderer {
        match self {
            ReportFormat::Tagged => &tagged::TaggedRenderer,
            ReportFormat::Markdown => &markdown::MarkdownRenderer,
            ReportFormat::Compact => &compact::CompactRenderer,
            ReportFormat::Json => &JsonRenderer,
        }
    }
}

/// Rendering policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    pub format: ReportFormat,
    pub max_response_chars: usize,
    pub truncation_marker: String,
}

impl ReportOptions {
    pub fn new(format: ReportFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    pub fn with_max_response_chars(mut self, max: usize) -> Self {
        self.max_response_chars = max;
        self
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            format: ReportFormat::default(),
            max_response_chars: DEFAULT_MAX_RESPONSE_CHARS,
            truncation_marker: DEFAULT_TRUNCATION_MARKER.to_string(),
        }
    }
}

/// Record counts shown at the top of every report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub total: usize,
    pub graphql: usize,
    pub rest: usize,
}

impl ReportSummary {
    pub fn from_records(records: &[NormalizedRecord]) -> Self {
        let total = records.len();
        let graphql = records.iter().filter(|r| r.is_graphql).count();
        Self {
            total,
            graphql,
            rest: total - graphql,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report<'a> {
    pub summary: ReportSummary,
    pub records: &'a [NormalizedRecord],
}

impl<'a> Report<'a> {
    pub fn new(records: &'a [NormalizedRecord]) -> Self {
        Self {
            summary: ReportSummary::from_records(records),
            records,
        }
    }
}

pub trait ReportRenderer {
    fn render(&self, report: &Report<'_>, options: &ReportOptions) -> Result<String>;
}

/// Render normalized records in the configured format
pub fn render(records: &[NormalizedRecord], options: &ReportOptions) -> Result<String> {
    let report = Report::new(records);

    tracing::debug!(
        "Rendering {} records as {} (graphql={}, rest={})",
        report.summary.total,
        options.format.as_str(),
        report.summary.graphql,
        report.summary.rest
    );

    options.format.renderer().render(&report, options)
}

/// Select, normalize and render a captured entry list in one call
pub fn report_entries(
    entries: &[Entry],
    selection: EntrySelection,
    options: &ReportOptions,
) -> Result<(ReportSummary, String)> {
    let records = normalize(select_entries(entries, selection));
    let summary = ReportSummary::from_records(&records);
    let text = render(&records, options)?;
    Ok((summary, text))
}

/// Cut `text` to the configured number of characters, appending the marker
/// after `separator` when anything was dropped
pub(crate) fn cap_response(text: &str, options: &ReportOptions, separator: &str) -> String {
    match text.char_indices().nth(options.max_response_chars) {
        Some((cut, _)) => format!("{}{}{}", &text[..cut], separator, options.truncation_marker),
        None => text.to_string(),
    }
}

struct JsonRenderer;

impl ReportRenderer for JsonRenderer {
    fn render(&self, report: &Report<'_>, _options: &ReportOptions) -> Result<String> {
        let mut json = serde_json::to_string_pretty(report).map_err(Error::Render)?;
        json.push('\n');
        Ok(json)
    }
}
