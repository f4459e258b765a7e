//! Directory rollups
//!
//! Adds every file's metrics to each directory in its ancestor chain, so a
//! directory's numbers cover all transitive descendant files. The children
//! map records an edge for every ancestor directory, which makes it a rooted
//! tree at "." with no dangling or cyclic references.

use crate::core::model::{ChildrenMap, DirectoryAggregates, FileRecord};
use crate::core::paths::ancestor_chain;

/// Build cumulative per-directory aggregates and the parent-to-children map.
/// The root entry is present even when no files were accepted.
pub fn aggregate(files: &[FileRecord]) -> (DirectoryAggregates, ChildrenMap) {
    let mut aggregates = DirectoryAggregates::new();
    let mut children = ChildrenMap::new();

    aggregates.entry(".".to_string()).or_default();
    children.entry(".".to_string()).or_default();

    for record in files {
        let chain = ancestor_chain(&record.path);
        for dir in &chain {
            aggregates.entry(dir.clone()).or_default().add(record);
        }
        for pair in chain.windows(2) {
            children
                .entry(pair[0].clone())
                .or_default()
                .insert(pair[1].clone());
        }
    }

    (aggregates, children)
}
