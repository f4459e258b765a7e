//! Export error taxonomy
//!
//! Only invocation-time conditions live here. Per-file read failures are not
//! errors: the collector converts them to skip-and-continue and the run keeps
//! going. Safety violations and size limits are reported as an ExportStatus,
//! not as errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    /// Root path missing or not a directory; surfaced before any work starts
    #[error("invalid root path {}: {reason}", path.display())]
    InvalidRoot { path: PathBuf, reason: String },

    /// A rule pattern could not be compiled into a glob
    #[error("invalid glob pattern \"{pattern}\": {source}")]
    Glob {
        pattern: String,
        source: globset::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
