//! Bundle rendering
//!
//! Produces the final text document with fixed, literal section markers.
//! Rendering is a pure function of its inputs (the timestamp arrives inside
//! RunSummary), so re-rendering the same data is byte-identical: every
//! ordering below is derived from sorted structures or stable sorts, never
//! from map iteration or traversal order.

use std::fmt::Write as _;

use crate::core::model::{
    ChildrenMap, DirectoryAggregates, ExtensionStats, FileRecord, RunSummary,
};
use crate::core::paths::base_name;

/// Number of entries in each ranking table
const TOP_N: usize = 20;

/// Render the complete bundle: summary header, extension table, directory
/// tree, per-file sections and the ranking tables.
pub fn render(
    summary: &RunSummary,
    by_extension: &ExtensionStats,
    aggregates: &DirectoryAggregates,
    children: &ChildrenMap,
    files: &[FileRecord],
) -> String {
    let mut out = String::new();

    out.push_str("===== REPO SUMMARY =====\n");
    let _ = writeln!(out, "Generated: {}", summary.generated_at);
    let _ = writeln!(out, "Tokenizer: {}", summary.tokenizer);
    let _ = writeln!(out, "Total files: {}", summary.total_files);
    let _ = writeln!(out, "Total tokens: {}", summary.total_tokens);
    let _ = writeln!(out, "Total bytes: {}", summary.total_bytes);

    out.push_str("\n===== SUMMARY BY EXTENSION =====\n");
    for (ext, stats) in by_extension {
        let _ = writeln!(
            out,
            "{}: files={}, tokens={}, bytes={}",
            ext, stats.files, stats.tokens, stats.bytes
        );
    }

    out.push_str("\n===== DIRECTORY TREE =====\n");
    let root = aggregates.get(".").copied().unwrap_or_default();
    let _ = writeln!(
        out,
        "./ (files: {}, tokens: {}, bytes: {})",
        root.files, root.tokens, root.bytes
    );
    render_tree(&mut out, aggregates, children, ".", "");

    out.push_str("\n===== FILES =====\n");
    let mut by_path: Vec<&FileRecord> = files.iter().collect();
    by_path.sort_by(|a, b| a.path.cmp(&b.path));
    for record in by_path {
        let _ = writeln!(out, "\n===== FILE: {} =====", record.path);
        let _ = writeln!(
            out,
            "[TOKENS: {} | LINES: {} | BYTES: {}]",
            record.tokens, record.lines, record.bytes
        );
        out.push_str(&record.content);
        out.push('\n');
    }

    // Stable sorts: ties keep the original collection order
    let mut by_tokens: Vec<&FileRecord> = files.iter().collect();
    by_tokens.sort_by(|a, b| b.tokens.cmp(&a.tokens));

    out.push_str("\n===== SUMMARY BY FILE =====\n");
    for record in &by_tokens {
        let _ = writeln!(
            out,
            "{} : {} tokens, {} lines, {} bytes",
            record.path, record.tokens, record.lines, record.bytes
        );
    }

    out.push_str("\n===== TOP 20 BY TOKENS =====\n");
    for record in by_tokens.iter().take(TOP_N) {
        let _ = writeln!(out, "{} : {} tokens", record.path, record.tokens);
    }

    out.push_str("\n===== TOP 20 BY BYTES =====\n");
    let mut by_bytes: Vec<&FileRecord> = files.iter().collect();
    by_bytes.sort_by(|a, b| b.bytes.cmp(&a.bytes));
    for record in by_bytes.iter().take(TOP_N) {
        let _ = writeln!(out, "{} : {} bytes", record.path, record.bytes);
    }

    out
}

/// Render the subtree below `current`. The last child at each level gets the
/// terminal connector and a blank continuation so deeper lines drop the
/// vertical bar.
fn render_tree(
    out: &mut String,
    aggregates: &DirectoryAggregates,
    children: &ChildrenMap,
    current: &str,
    prefix: &str,
) {
    let Some(kids) = children.get(current) else {
        return;
    };
    let count = kids.len();
    for (idx, child) in kids.iter().enumerate() {
        let last = idx + 1 == count;
        let branch = if last { "└── " } else { "├── " };
        let stats = aggregates.get(child).copied().unwrap_or_default();
        let _ = writeln!(
            out,
            "{}{}{}/ (files: {}, tokens: {}, bytes: {})",
            prefix,
            branch,
            base_name(child),
            stats.files,
            stats.tokens,
            stats.bytes
        );
        let continuation = if last { "    " } else { "│   " };
        render_tree(
            out,
            aggregates,
            children,
            child,
            &format!("{}{}", prefix, continuation),
        );
    }
}
