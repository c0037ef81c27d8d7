use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed {method} event: {source}")]
    Event {
        method: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed event message: {0}")]
    Message(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
