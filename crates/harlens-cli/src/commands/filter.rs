use super::read_har;
use anyhow::Result;
use harlens_core::EntrySelection;
use harlens_core::har::HarWriter;
use std::io::{self, Write};
use std::path::Path;

/// Write a HAR containing only the selected entries
pub fn execute(file: Option<&Path>, selection: EntrySelection, output: Option<&Path>) -> Result<()> {
    let har = read_har(file)?;

    tracing::debug!("Applying selection: {}", selection.as_str());
    let filtered_har = harlens_core::filter::filter_har(&har, selection)?;

    tracing::info!(
        "Kept {} of {} entries",
        filtered_har.log.entries.len(),
        har.log.entries.len()
    );

    if let Some(output_path) = output {
        HarWriter::to_file(&filtered_har, output_path)?;
    } else {
        tracing::debug!("Writing filtered HAR to stdout");
        let json = HarWriter::to_string(&filtered_har)?;
        let mut stdout = io::stdout().lock();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
    }

    Ok(())
}
