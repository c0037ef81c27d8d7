use super::types::Har;
use crate::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

pub struct HarReader;

impl HarReader {
    /// Read and parse a HAR file from the given path
    pub fn from_file(path: &Path) -> Result<Har> {
        tracing::debug!("Reading HAR file from: {}", path.display());

        let file = File::open(path)?;
        let har = Self::from_reader(BufReader::new(file))?;

        tracing::info!(
            "Successfully parsed HAR file with {} entries",
            har.log.entries.len()
        );

        Ok(har)
    }

    /// Parse a HAR document from any reader (e.g. stdin)
    pub fn from_reader<R: Read>(reader: R) -> Result<Har> {
        let har: Har = serde_json::from_reader(reader)?;
        Ok(har)
    }

    /// Parse a HAR document from a JSON string
    pub fn from_str(content: &str) -> Result<Har> {
        tracing::debug!("Parsing HAR from string");

        let har: Har = serde_json::from_str(content)?;

        tracing::debug!("Parsed HAR from string with {} entries", har.log.entries.len());

        Ok(har)
    }

    /// Check the fields the report relies on beyond what deserialization enforces
    pub fn validate(har: &Har) -> Result<()> {
        tracing::debug!("Validating HAR structure");

        if har.log.version.is_empty() {
            return Err(Error::InvalidStructure("Missing HAR version".to_string()));
        }

        if har.log.entries.is_empty() {
            tracing::warn!("HAR input contains no entries");
        }

        for (idx, entry) in har.log.entries.iter().enumerate() {
            if entry.request.method.is_empty() {
                return Err(Error::InvalidStructure(format!(
                    "Entry {} has empty request method",
                    idx
                )));
            }
            if entry.request.url.is_empty() {
                return Err(Error::InvalidStructure(format!(
                    "Entry {} has empty request URL",
                    idx
                )));
            }
            if entry.started_date_time.is_empty() {
                return Err(Error::InvalidStructure(format!(
                    "Entry {} has empty startedDateTime",
                    idx
                )));
            }
            if !entry.time.is_finite() || entry.time < 0.0 {
                return Err(Error::InvalidStructure(format!(
                    "Entry {} has invalid time {}",
                    idx, entry.time
                )));
            }
        }

        tracing::debug!("HAR structure is valid");
        Ok(())
    }
}
