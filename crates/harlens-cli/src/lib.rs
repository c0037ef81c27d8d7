use clap::ValueEnum;
use harlens_core::ReportFormat;

pub mod commands;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Tagged,
    Markdown,
    Compact,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Tagged => ReportFormat::Tagged,
            OutputFormat::Markdown => ReportFormat::Markdown,
            OutputFormat::Compact => ReportFormat::Compact,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}
