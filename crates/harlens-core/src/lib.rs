pub mod body;
pub mod error;
pub mod filter;
pub mod har;
pub mod report;

pub use body::Body;
pub use error::{Error, Result};
pub use filter::EntrySelection;
pub use report::{NormalizedRecord, ReportFormat, ReportOptions};
