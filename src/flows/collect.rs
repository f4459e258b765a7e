//! File collection - read candidates and accumulate metrics
//!
//! Sensitive candidates are set aside without touching the disk unless the
//! caller explicitly allowed secrets; the orchestrator decides afterwards
//! whether the run may continue. Read failures never abort the run: the file
//! is skipped and recorded so it can be reported.
//!
//! With the `parallel` feature, file reads run on the rayon pool; results are
//! reassembled in candidate order, so the output contract is unchanged.

use std::fs;
use std::path::Path;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::core::model::{Collection, FileRecord};
use crate::core::paths::normalized_extension;
use crate::core::rules::RuleEngine;
use crate::core::tokenizer::Tokenizer;

/// Count lines: a trailing newline does not open a new line, but a
/// non-terminated final line still counts.
fn count_lines(content: &str) -> usize {
    let newlines = content.matches('\n').count();
    if !content.is_empty() && !content.ends_with('\n') {
        newlines + 1
    } else {
        newlines
    }
}

/// Read one candidate: raw bytes for the on-disk size, lossy UTF-8 decode so
/// invalid bytes are replaced instead of failing the file.
fn read_candidate(root: &Path, rel_path: &str) -> Result<(String, u64), String> {
    let bytes = fs::read(root.join(rel_path)).map_err(|e| e.to_string())?;
    let size = bytes.len() as u64;
    Ok((String::from_utf8_lossy(&bytes).into_owned(), size))
}

/// Read every candidate and accumulate per-file, per-extension and total
/// metrics. Candidates matching the sensitive patterns are recorded in
/// `blocked_sensitive` (unread) when `allow_secrets` is false.
pub fn collect(
    root: &Path,
    candidates: impl Iterator<Item = String>,
    engine: &RuleEngine,
    allow_secrets: bool,
    tokenizer: Tokenizer,
) -> Collection {
    let mut out = Collection::default();

    let mut to_read = Vec::new();
    for rel in candidates {
        if !allow_secrets && engine.is_sensitive(&rel) {
            out.blocked_sensitive.push(rel);
            continue;
        }
        to_read.push(rel);
    }

    #[cfg(feature = "parallel")]
    let results: Vec<(String, Result<(String, u64), String>)> = to_read
        .into_par_iter()
        .map(|rel| {
            let read = read_candidate(root, &rel);
            (rel, read)
        })
        .collect();

    #[cfg(not(feature = "parallel"))]
    let results: Vec<(String, Result<(String, u64), String>)> = to_read
        .into_iter()
        .map(|rel| {
            let read = read_candidate(root, &rel);
            (rel, read)
        })
        .collect();

    for (rel, read) in results {
        match read {
            Ok((content, bytes)) => {
                let record = FileRecord {
                    tokens: tokenizer.count(&content),
                    lines: count_lines(&content),
                    bytes,
                    path: rel,
                    content,
                };
                out.total_tokens += record.tokens;
                out.total_bytes += record.bytes;
                out.by_extension
                    .entry(normalized_extension(&record.path))
                    .or_default()
                    .add(&record);
                out.files.push(record);
            }
            Err(err) => out.skipped.push((rel, err)),
        }
    }

    out
}
