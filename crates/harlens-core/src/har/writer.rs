use super::types::Har;
use crate::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct HarWriter;

impl HarWriter {
    /// Write a HAR structure to a file
    pub fn to_file(har: &Har, path: &Path) -> Result<()> {
        tracing::debug!("Writing HAR file to: {}", path.display());

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, har)?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        tracing::info!(
            "Wrote HAR file with {} entries to {}",
            har.log.entries.len(),
            path.display()
        );

        Ok(())
    }

    /// Convert a HAR structure to a pretty JSON string
    pub fn to_string(har: &Har) -> Result<String> {
        Ok(serde_json::to_string_pretty(har)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::har::{HarReader, Log};
    use tempfile::TempDir;

    #[test]
    fn test_har_to_string() {
        let har = Har {
            log: Log::new(vec![]),
        };

        let json = HarWriter::to_string(&har).unwrap();
        assert!(json.contains("\"version\": \"1.2\""));
        assert!(json.contains("\"name\": \"harlens\""));
    }

    #[test]
    fn test_to_file_can_be_read_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.har");
        let har = Har {
            log: Log::new(vec![]),
        };

        HarWriter::to_file(&har, &path).unwrap();

        let read = HarReader::from_file(&path).unwrap();
        assert_eq!(read.log.creator.name, "harlens");
    }
}
