//! Export data model
//!
//! Everything the pipeline stages hand to each other lives here. Records are
//! created once during collection and are immutable afterwards; each stage
//! owns its working state exclusively and passes on read-only results.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One accepted file with its content and metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path relative to root, using '/' as separator
    pub path: String,
    /// Token count as measured by the selected tokenizer
    pub tokens: usize,
    /// Line count; a trailing newline does not open a new line
    pub lines: usize,
    /// Byte size on disk, not decoded-text length
    pub bytes: u64,
    /// Decoded file content (lossy UTF-8)
    #[serde(skip)]
    pub content: String,
}

/// Rolled-up metrics for a directory or an extension bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirStats {
    pub files: usize,
    pub tokens: usize,
    pub bytes: u64,
}

impl DirStats {
    /// Add one file's metrics to this bucket
    pub fn add(&mut self, record: &FileRecord) {
        self.files += 1;
        self.tokens += record.tokens;
        self.bytes += record.bytes;
    }
}

/// Per-extension metrics keyed by normalized extension
/// (lowercased, leading dot, `<no-ext>` for extensionless files)
pub type ExtensionStats = BTreeMap<String, DirStats>;

/// Cumulative per-directory metrics keyed by relative path ("." for root).
/// A directory's numbers cover all transitive descendant files, not just
/// its immediate children.
pub type DirectoryAggregates = BTreeMap<String, DirStats>;

/// Immediate child directories per directory path; forms a rooted tree at "."
pub type ChildrenMap = BTreeMap<String, BTreeSet<String>>;

/// Everything the collector produces for one run
#[derive(Debug, Default)]
pub struct Collection {
    /// Accepted files in walk order
    pub files: Vec<FileRecord>,
    /// Candidates blocked by the sensitivity rules; never read from disk
    pub blocked_sensitive: Vec<String>,
    /// Candidates skipped due to read errors, with the error text
    pub skipped: Vec<(String, String)>,
    pub by_extension: ExtensionStats,
    pub total_tokens: usize,
    pub total_bytes: u64,
}

/// Header data for the rendered bundle
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Generation timestamp (RFC 3339); injected so tests can freeze it
    pub generated_at: String,
    /// Tokenizer identifier written verbatim into the bundle
    pub tokenizer: String,
    pub total_files: usize,
    pub total_tokens: usize,
    pub total_bytes: u64,
}

/// Final status of an export run, mapped onto the process exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStatus {
    /// Bundle written, or preview completed
    Success,
    /// Sensitive files blocked and not explicitly allowed; nothing written
    SafetyViolation,
    /// Collected bytes exceed the caller's ceiling; nothing written
    LimitExceeded,
}

impl ExportStatus {
    pub fn code(self) -> i32 {
        match self {
            ExportStatus::Success => 0,
            ExportStatus::SafetyViolation => 2,
            ExportStatus::LimitExceeded => 3,
        }
    }
}
