//! Report writer trait and output errors

use crate::output::Site;
use thiserror::Error;

/// Errors that can occur while writing reports
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to create {path}: {source}")]
    Create {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Persists a finished crawl
///
/// Implementations overwrite any previous output; there are no append
/// semantics. A failure to create the destination is returned to the caller,
/// which treats it as fatal.
pub trait ReportWriter {
    fn write_report(&self, site: &Site) -> OutputResult<()>;
}
