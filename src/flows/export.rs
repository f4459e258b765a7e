//! Export orchestration
//!
//! Runs the pipeline end to end: load ignore rules, walk, collect, apply the
//! safety and size gates, aggregate, render, write. Fatal pipeline conditions
//! (blocked secrets, size ceiling) come back as an ExportStatus so the CLI
//! can map them onto exit codes; only invocation problems are errors.

use anyhow::Result;
use chrono::Local;
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::core::error::ExportError;
use crate::core::model::{Collection, ExportStatus, ExtensionStats, RunSummary};
use crate::core::rules::{load_ignore_file, RuleEngine, RuleSet};
use crate::core::tokenizer::Tokenizer;
use crate::flows::{aggregate, collect, render, walk};

/// Blocked-secrets report is capped at this many paths
const BLOCKED_REPORT_LIMIT: usize = 20;
/// Advisory included-secrets warning is capped at this many paths
const ALLOWED_REPORT_LIMIT: usize = 5;
/// Preview shows at most this many extension buckets
const PREVIEW_EXTENSION_LIMIT: usize = 10;

/// Caller-supplied knobs for one export run
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Include files matching sensitive patterns instead of blocking the run
    pub allow_secrets: bool,
    /// Load and apply the root .gitignore
    pub respect_gitignore: bool,
    /// Abort with LimitExceeded when collected bytes exceed this ceiling
    pub max_bytes: Option<u64>,
    /// Compute and print statistics without writing anything
    pub preview: bool,
    /// Emit preview statistics as JSON instead of text
    pub json: bool,
    /// Suppress skip notices and advisory warnings
    pub quiet: bool,
}

/// Preview statistics; identical to what a write run puts in the header
#[derive(Debug, Clone, Serialize)]
pub struct PreviewStats {
    pub tokenizer: String,
    pub total_files: usize,
    pub total_tokens: usize,
    pub total_bytes: u64,
    pub by_extension: ExtensionStats,
}

/// Export the repository at `root` into a single text bundle at `output`.
///
/// Returns the run status (success, safety violation, limit exceeded); a
/// missing or non-directory root is an error instead, surfaced before any
/// work is attempted.
pub fn export_repo(
    root: &Path,
    output: &Path,
    options: &ExportOptions,
    tokenizer: Tokenizer,
) -> Result<ExportStatus> {
    if !root.exists() {
        return Err(ExportError::InvalidRoot {
            path: root.to_path_buf(),
            reason: "path does not exist".to_string(),
        }
        .into());
    }
    if !root.is_dir() {
        return Err(ExportError::InvalidRoot {
            path: root.to_path_buf(),
            reason: "not a directory".to_string(),
        }
        .into());
    }

    let ignore_patterns = if options.respect_gitignore {
        load_ignore_file(root)
    } else {
        Vec::new()
    };
    let engine = RuleEngine::new(&RuleSet::default(), &ignore_patterns)?;

    let candidates = walk::walk_candidates(root, &engine);
    let collection = collect::collect(root, candidates, &engine, options.allow_secrets, tokenizer);

    if !options.quiet {
        for (path, err) in &collection.skipped {
            eprintln!("{}", format!("[skip] {}: {}", path, err).yellow());
        }
    }

    // Safety gate: blocked secrets abort the whole run, nothing is written
    if !collection.blocked_sensitive.is_empty() && !options.allow_secrets {
        report_blocked(&collection.blocked_sensitive);
        return Ok(ExportStatus::SafetyViolation);
    }
    if options.allow_secrets && !options.quiet {
        warn_included_secrets(&collection, &engine);
    }

    if options.preview {
        return print_preview(&collection, tokenizer, options);
    }

    if let Some(limit) = options.max_bytes {
        if collection.total_bytes > limit {
            eprintln!(
                "{}",
                format!(
                    "[LIMIT] Total bytes {} exceed --max-bytes={}. Use --preview first or raise the limit.",
                    collection.total_bytes, limit
                )
                .red()
            );
            return Ok(ExportStatus::LimitExceeded);
        }
    }

    let (aggregates, children) = aggregate::aggregate(&collection.files);
    let summary = RunSummary {
        generated_at: Local::now().to_rfc3339(),
        tokenizer: tokenizer.name().to_string(),
        total_files: collection.files.len(),
        total_tokens: collection.total_tokens,
        total_bytes: collection.total_bytes,
    };
    let bundle = render::render(
        &summary,
        &collection.by_extension,
        &aggregates,
        &children,
        &collection.files,
    );
    fs::write(output, bundle)?;

    Ok(ExportStatus::Success)
}

/// The blocked list never includes file contents, only paths
fn report_blocked(blocked: &[String]) {
    eprintln!(
        "{}",
        "[SAFETY] Sensitive-looking files were blocked by default:"
            .red()
            .bold()
    );
    for path in blocked.iter().take(BLOCKED_REPORT_LIMIT) {
        eprintln!(" - {}", path);
    }
    if blocked.len() > BLOCKED_REPORT_LIMIT {
        eprintln!(" ... and {} more", blocked.len() - BLOCKED_REPORT_LIMIT);
    }
    eprintln!("Re-run with --allow-secrets if you know what you're doing.");
}

/// Advisory only: the run proceeds, the operator gets the list
fn warn_included_secrets(collection: &Collection, engine: &RuleEngine) {
    let included: Vec<&str> = collection
        .files
        .iter()
        .map(|f| f.path.as_str())
        .filter(|p| engine.is_sensitive(p))
        .collect();
    if included.is_empty() {
        return;
    }
    eprintln!(
        "{}",
        format!(
            "[WARNING] Including {} sensitive files (--allow-secrets enabled)",
            included.len()
        )
        .yellow()
    );
    for path in included.iter().take(ALLOWED_REPORT_LIMIT) {
        eprintln!(" - {}", path);
    }
    if included.len() > ALLOWED_REPORT_LIMIT {
        eprintln!(" ... and {} more", included.len() - ALLOWED_REPORT_LIMIT);
    }
}

/// Print statistics without writing anything; the size ceiling still applies
/// so a preview can predict a failing write run.
fn print_preview(
    collection: &Collection,
    tokenizer: Tokenizer,
    options: &ExportOptions,
) -> Result<ExportStatus> {
    if options.json {
        let stats = PreviewStats {
            tokenizer: tokenizer.name().to_string(),
            total_files: collection.files.len(),
            total_tokens: collection.total_tokens,
            total_bytes: collection.total_bytes,
            by_extension: collection.by_extension.clone(),
        };
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("===== PREVIEW =====");
        println!("Tokenizer: {}", tokenizer.name());
        println!("Total candidate files: {}", collection.files.len());
        println!("Estimated total tokens: {}", collection.total_tokens);
        println!("Estimated total bytes: {}", collection.total_bytes);
        println!("Top extensions:");
        for (ext, stats) in collection.by_extension.iter().take(PREVIEW_EXTENSION_LIMIT) {
            println!(
                " {}: files={}, tokens={}, bytes={}",
                ext, stats.files, stats.tokens, stats.bytes
            );
        }
    }

    if let Some(limit) = options.max_bytes {
        if collection.total_bytes > limit {
            eprintln!(
                "{}",
                format!(
                    "[LIMIT] Estimated bytes {} exceed --max-bytes={}",
                    collection.total_bytes, limit
                )
                .red()
            );
            return Ok(ExportStatus::LimitExceeded);
        }
    }
    Ok(ExportStatus::Success)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_file(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn options() -> ExportOptions {
        ExportOptions {
            respect_gitignore: true,
            quiet: true,
            ..ExportOptions::default()
        }
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("nope");
        let out = temp.path().join("out.txt");
        let result = export_repo(&missing, &out, &options(), Tokenizer::WordsApprox);
        assert!(result.is_err());
    }

    #[test]
    fn test_file_root_is_an_error() {
        let temp = tempdir().unwrap();
        write_file(temp.path(), "plain.txt", "x");
        let out = temp.path().join("out.txt");
        let result = export_repo(
            &temp.path().join("plain.txt"),
            &out,
            &options(),
            Tokenizer::WordsApprox,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_basic_export_writes_bundle() {
        let temp = tempdir().unwrap();
        write_file(temp.path(), "main.py", "print('hello world')");
        write_file(temp.path(), "src/utils.py", "def helper(): pass");
        let out = temp.path().join("out.txt");

        let status = export_repo(temp.path(), &out, &options(), Tokenizer::WordsApprox).unwrap();
        assert_eq!(status, ExportStatus::Success);

        let bundle = fs::read_to_string(&out).unwrap();
        assert!(bundle.contains("===== REPO SUMMARY ====="));
        assert!(bundle.contains("Tokenizer: words_approx"));
        assert!(bundle.contains("===== FILE: main.py ====="));
        assert!(bundle.contains("===== FILE: src/utils.py ====="));
        assert!(bundle.contains("print('hello world')"));
    }

    #[test]
    fn test_secrets_block_the_run() {
        let temp = tempdir().unwrap();
        write_file(temp.path(), "main.py", "print('hello')");
        write_file(temp.path(), ".env", "SECRET=1");
        let out = temp.path().join("out.txt");

        let status = export_repo(temp.path(), &out, &options(), Tokenizer::WordsApprox).unwrap();
        assert_eq!(status, ExportStatus::SafetyViolation);
        assert!(!out.exists());
    }

    #[test]
    fn test_secrets_allowed_includes_them() {
        let temp = tempdir().unwrap();
        write_file(temp.path(), "main.py", "print('hello')");
        write_file(temp.path(), ".env", "SECRET=1");
        let out = temp.path().join("out.txt");

        let opts = ExportOptions {
            allow_secrets: true,
            ..options()
        };
        let status = export_repo(temp.path(), &out, &opts, Tokenizer::WordsApprox).unwrap();
        assert_eq!(status, ExportStatus::Success);

        let bundle = fs::read_to_string(&out).unwrap();
        assert!(bundle.contains("===== FILE: .env ====="));
        assert!(bundle.contains("SECRET=1"));
        assert!(bundle.contains("===== FILE: main.py ====="));
    }

    #[test]
    fn test_gitignore_toggle() {
        let temp = tempdir().unwrap();
        write_file(temp.path(), ".gitignore", "*.log\n");
        write_file(temp.path(), "debug.log", "log content");
        write_file(temp.path(), "main.py", "print('hello')");
        // Output goes outside the root so the second run does not pick up
        // the first run's bundle.
        let outdir = tempdir().unwrap();
        let out = outdir.path().join("out.txt");

        let status = export_repo(temp.path(), &out, &options(), Tokenizer::WordsApprox).unwrap();
        assert_eq!(status, ExportStatus::Success);
        let bundle = fs::read_to_string(&out).unwrap();
        assert!(!bundle.contains("===== FILE: debug.log ====="));

        let opts = ExportOptions {
            respect_gitignore: false,
            ..options()
        };
        let status = export_repo(temp.path(), &out, &opts, Tokenizer::WordsApprox).unwrap();
        assert_eq!(status, ExportStatus::Success);
        let bundle = fs::read_to_string(&out).unwrap();
        assert!(bundle.contains("===== FILE: debug.log ====="));
    }

    #[test]
    fn test_max_bytes_gate() {
        let temp = tempdir().unwrap();
        write_file(temp.path(), "large.txt", &"x".repeat(1000));
        let out = temp.path().join("out.txt");

        let opts = ExportOptions {
            max_bytes: Some(500),
            ..options()
        };
        let status = export_repo(temp.path(), &out, &opts, Tokenizer::WordsApprox).unwrap();
        assert_eq!(status, ExportStatus::LimitExceeded);
        assert!(!out.exists());

        let opts = ExportOptions {
            max_bytes: Some(5000),
            ..options()
        };
        let status = export_repo(temp.path(), &out, &opts, Tokenizer::WordsApprox).unwrap();
        assert_eq!(status, ExportStatus::Success);
        assert!(out.exists());
    }

    #[test]
    fn test_preview_never_writes() {
        let temp = tempdir().unwrap();
        write_file(temp.path(), "main.py", "print('hello world')");
        let out = temp.path().join("out.txt");

        let opts = ExportOptions {
            preview: true,
            ..options()
        };
        let status = export_repo(temp.path(), &out, &opts, Tokenizer::WordsApprox).unwrap();
        assert_eq!(status, ExportStatus::Success);
        assert!(!out.exists());
    }

    #[test]
    fn test_preview_applies_limit_without_writing() {
        let temp = tempdir().unwrap();
        write_file(temp.path(), "large.txt", &"x".repeat(1000));
        let out = temp.path().join("out.txt");

        let opts = ExportOptions {
            preview: true,
            max_bytes: Some(500),
            ..options()
        };
        let status = export_repo(temp.path(), &out, &opts, Tokenizer::WordsApprox).unwrap();
        assert_eq!(status, ExportStatus::LimitExceeded);
        assert!(!out.exists());
    }

    #[test]
    fn test_empty_root_produces_valid_bundle() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("out.txt");

        let status = export_repo(temp.path(), &out, &options(), Tokenizer::WordsApprox).unwrap();
        assert_eq!(status, ExportStatus::Success);

        let bundle = fs::read_to_string(&out).unwrap();
        assert!(bundle.contains("Total files: 0\n"));
        assert!(bundle.contains("./ (files: 0, tokens: 0, bytes: 0)\n"));
    }
}
