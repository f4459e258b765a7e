//! repodigest - Export a repository into a single AI-ready text bundle
//!
//! repodigest provides:
//! - Rule-based filtering (built-in excludes, .gitignore patterns, sensitive files)
//! - Token/line/byte metrics per file, per extension and per directory
//! - A deterministic text bundle with summaries and a directory tree

use clap::Parser;

mod cli;
mod core;
mod flows;

fn main() {
    let cli = cli::Cli::parse();
    match cli::run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("[error] {:#}", e);
            std::process::exit(1);
        }
    }
}
