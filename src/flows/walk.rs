//! Candidate discovery
//!
//! Walks the tree with walkdir, pruning excluded directory names before
//! descent (so their contents cost no I/O and never reach classification)
//! and visiting entries within each directory in lexicographic order for
//! deterministic output.

use std::path::Path;
use walkdir::WalkDir;

use crate::core::paths::make_relative;
use crate::core::rules::{Classification, RuleEngine};

/// Yield relative paths of candidate files under `root`.
///
/// Sensitivity is deliberately not checked here; the collector runs the
/// sensitive patterns itself so blocked files can be reported separately
/// from ordinary noise.
pub fn walk_candidates<'a>(
    root: &'a Path,
    engine: &'a RuleEngine,
) -> impl Iterator<Item = String> + 'a {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |entry| {
            if entry.depth() == 0 {
                return true;
            }
            // Prunes excluded directories before descending into them; also
            // drops files whose bare name matches an exclusion glob.
            let name = entry.file_name().to_string_lossy();
            !engine.is_excluded_name(&name)
        })
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(move |entry| {
            let name = entry.file_name().to_string_lossy();
            if RuleEngine::is_minified_name(&name) {
                return None;
            }
            let rel = make_relative(entry.path(), root)?;
            match engine.classify(&rel, false) {
                Classification::Ignored => None,
                _ => Some(rel),
            }
        })
}
