use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read HAR input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse HAR input: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid HAR structure: {0}")]
    InvalidStructure(String),

    #[error("Failed to render report: {0}")]
    Render(#[source] serde_json::Error),

    #[error("No entries matched the selection ({0})")]
    NoMatches(String),
}

pub type Result<T> = std::result::Result<T, Error>;
