pub mod completion;
pub mod events;
pub mod filter;
pub mod report;

use anyhow::{Context, Result};
use harlens_core::har::{Har, HarReader};
use std::io::{self, Write};
use std::path::Path;

/// Read and validate a HAR document from `file`, or stdin when absent or `-`
pub fn read_har(file: Option<&Path>) -> Result<Har> {
    let har = match file {
        Some(path) if path != Path::new("-") => HarReader::from_file(path)
            .with_context(|| format!("Could not load HAR file {}", path.display()))?,
        _ => {
            tracing::debug!("Reading HAR from stdin");
            HarReader::from_reader(io::stdin().lock()).context("Could not load HAR from stdin")?
        }
    };

    HarReader::validate(&har)?;
    Ok(har)
}

/// Write text to a file, or stdout when no path is given
pub fn write_output(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            tracing::debug!("Writing output to: {}", path.display());
            std::fs::write(path, text)
                .with_context(|| format!("Could not write {}", path.display()))?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
