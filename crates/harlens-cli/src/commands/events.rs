use super::write_output;
use anyhow::{Context, Result};
use harlens_capture::{CaptureEvent, CaptureLimits, CaptureSession};
use harlens_core::EntrySelection;
use harlens_core::har::{Entry, Har, HarWriter, Log};
use harlens_core::report::{ReportOptions, ReportSummary, report_entries};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Replay a JSON-lines DevTools event log through a capture session
pub fn load_events(file: &Path, limits: CaptureLimits) -> Result<Vec<Entry>> {
    tracing::debug!("Reading DevTools event log: {}", file.display());

    let reader = BufReader::new(
        File::open(file).with_context(|| format!("Could not open {}", file.display()))?,
    );

    let mut session = CaptureSession::begin(limits);
    let mut skipped = 0usize;

    // Split as bytes: a line of invalid UTF-8 is skipped like malformed JSON
    for (idx, line) in reader.split(b'\n').enumerate() {
        let line = line.with_context(|| format!("Could not read {}", file.display()))?;
        let parsed = String::from_utf8(line)
            .map_err(|e| e.to_string())
            .and_then(|text| {
                if text.trim().is_empty() {
                    return Ok(None);
                }
                CaptureEvent::from_json_line(&text).map_err(|e| e.to_string())
            });

        match parsed {
            Ok(Some(event)) => session.record_event(event),
            Ok(None) => {}
            Err(e) => {
                skipped += 1;
                tracing::warn!("Skipping line {}: {}", idx + 1, e);
            }
        }
    }

    let status = session.status();
    tracing::debug!(
        "Event log replayed: {} completed, {} in flight, {} lines skipped",
        status.completed,
        status.in_flight,
        skipped
    );

    Ok(session.finalize())
}

pub fn execute(
    file: &Path,
    limits: CaptureLimits,
    selection: EntrySelection,
    options: &ReportOptions,
    har_out: Option<&Path>,
    output: Option<&Path>,
) -> Result<ReportSummary> {
    let entries = load_events(file, limits)?;

    if let Some(path) = har_out {
        let har = Har {
            log: Log::new(entries.clone()),
        };
        HarWriter::to_file(&har, path)?;
    }

    let (summary, text) = report_entries(&entries, selection, options)?;
    write_output(&text, output)?;

    if let Some(path) = output {
        super::report::print_saved(&summary, path);
    }

    Ok(summary)
}
