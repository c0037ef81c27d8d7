use super::{read_har, write_output};
use anyhow::Result;
use harlens_core::EntrySelection;
use harlens_core::report::{ReportOptions, ReportSummary, report_entries};
use std::path::Path;

/// Read a HAR file (or stdin) and build the report text
pub fn generate_report(
    file: Option<&Path>,
    selection: EntrySelection,
    options: &ReportOptions,
) -> Result<(ReportSummary, String)> {
    let har = read_har(file)?;
    Ok(report_entries(&har.log.entries, selection, options)?)
}

pub fn execute(
    file: Option<&Path>,
    selection: EntrySelection,
    options: &ReportOptions,
    output: Option<&Path>,
) -> Result<ReportSummary> {
    let (summary, text) = generate_report(file, selection, options)?;

    tracing::info!(
        "Extracted {} API calls ({} graphql, {} rest)",
        summary.total,
        summary.graphql,
        summary.rest
    );

    write_output(&text, output)?;

    if let Some(path) = output {
        print_saved(&summary, path);
    }

    Ok(summary)
}

/// One styled line on stderr so stdout stays clean for piping
pub(crate) fn print_saved(summary: &ReportSummary, path: &Path) {
    use console::style;

    eprintln!(
        "{} {} API calls ({} graphql, {} rest) -> {}",
        style("✓").green().bold(),
        style(summary.total).bold(),
        summary.graphql,
        summary.rest,
        style(path.display()).cyan()
    );
}
