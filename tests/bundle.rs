//! Bundle structure tests for repodigest
//!
//! These tests exercise the full binary against a small fixture tree and
//! verify the shape of the emitted bundle:
//! - Section markers appear exactly once and in the documented order
//! - The directory tree uses box-drawing connectors with correct prefixes
//! - File sections are sorted by path, rankings by metric descending
//! - Two runs over the same tree differ only in the timestamp line

use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn repodigest_cmd() -> Command {
    Command::cargo_bin("repodigest").expect("failed to find repodigest binary")
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Build a fixture tree with root files, nested directories and noise
fn sample_tree(root: &Path) {
    write_file(&root.join("README.md"), "# Sample\n\nA tiny project.\n");
    write_file(&root.join("src/main.rs"), "fn main() {\n    run();\n}\n");
    write_file(&root.join("src/lib/util.rs"), "pub fn run() {}\n");
    write_file(&root.join("docs/guide.md"), "Read me first.\n");
    write_file(&root.join("logo.png"), "binary noise");
    write_file(&root.join("node_modules/x/y.js"), "noise");
}

fn export(root: &Path) -> String {
    let outdir = tempdir().unwrap();
    let out = outdir.path().join("bundle.txt");
    repodigest_cmd()
        .arg(root)
        .arg("-o")
        .arg(&out)
        .arg("--tokenizer")
        .arg("words")
        .assert()
        .code(0);
    fs::read_to_string(&out).unwrap()
}

#[test]
fn sections_are_unique_and_ordered() {
    let temp = tempdir().unwrap();
    sample_tree(temp.path());
    let bundle = export(temp.path());

    let markers = [
        "===== REPO SUMMARY =====",
        "===== SUMMARY BY EXTENSION =====",
        "===== DIRECTORY TREE =====",
        "===== FILES =====",
        "===== SUMMARY BY FILE =====",
        "===== TOP 20 BY TOKENS =====",
        "===== TOP 20 BY BYTES =====",
    ];

    let mut previous = 0;
    for marker in markers {
        assert_eq!(
            bundle.matches(marker).count(),
            1,
            "marker {} must appear exactly once",
            marker
        );
        let pos = bundle.find(marker).unwrap();
        assert!(pos >= previous, "marker {} out of order", marker);
        previous = pos;
    }
}

#[test]
fn directory_tree_renders_with_connectors() {
    let temp = tempdir().unwrap();
    sample_tree(temp.path());
    let bundle = export(temp.path());

    let tree = bundle
        .split("===== DIRECTORY TREE =====\n")
        .nth(1)
        .unwrap()
        .split("\n=====")
        .next()
        .unwrap();

    // 4 accepted files: README.md, docs/guide.md, src/main.rs, src/lib/util.rs
    let lines: Vec<&str> = tree.lines().collect();
    assert!(lines[0].starts_with("./ (files: 4,"));
    assert!(lines[1].starts_with("├── docs/ (files: 1,"));
    assert!(lines[2].starts_with("└── src/ (files: 2,"));
    assert!(lines[3].starts_with("    └── lib/ (files: 1,"));
}

#[test]
fn file_sections_are_sorted_by_path() {
    let temp = tempdir().unwrap();
    sample_tree(temp.path());
    let bundle = export(temp.path());

    let readme = bundle.find("===== FILE: README.md =====").unwrap();
    let guide = bundle.find("===== FILE: docs/guide.md =====").unwrap();
    let lib = bundle.find("===== FILE: src/lib/util.rs =====").unwrap();
    let main = bundle.find("===== FILE: src/main.rs =====").unwrap();
    assert!(readme < guide && guide < lib && lib < main);

    // Noise never shows up
    assert!(!bundle.contains("FILE: logo.png"));
    assert!(!bundle.contains("node_modules"));
}

#[test]
fn rankings_are_descending() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("big.txt"), "one two three four five\n");
    write_file(&temp.path().join("small.txt"), "one\n");
    let bundle = export(temp.path());

    let section = bundle
        .split("===== TOP 20 BY TOKENS =====\n")
        .nth(1)
        .unwrap()
        .split("\n=====")
        .next()
        .unwrap();
    let order: Vec<&str> = section
        .lines()
        .filter(|l| !l.is_empty())
        .map(|l| l.split(" : ").next().unwrap())
        .collect();
    assert_eq!(order, vec!["big.txt", "small.txt"]);
}

#[test]
fn repeated_runs_differ_only_in_timestamp() {
    let temp = tempdir().unwrap();
    sample_tree(temp.path());

    let first = export(temp.path());
    let second = export(temp.path());

    let strip_timestamp = |bundle: &str| -> String {
        bundle
            .lines()
            .filter(|line| !line.starts_with("Generated: "))
            .collect::<Vec<_>>()
            .join("\n")
    };
    assert_eq!(strip_timestamp(&first), strip_timestamp(&second));
}

#[test]
fn summary_header_matches_file_sections() {
    let temp = tempdir().unwrap();
    sample_tree(temp.path());
    let bundle = export(temp.path());

    assert!(bundle.contains("Tokenizer: words_approx\n"));
    assert!(bundle.contains("Total files: 4\n"));

    // Every accepted file appears in the per-file summary
    let summary = bundle
        .split("===== SUMMARY BY FILE =====\n")
        .nth(1)
        .unwrap()
        .split("\n=====")
        .next()
        .unwrap();
    assert_eq!(summary.lines().filter(|l| !l.is_empty()).count(), 4);
}
