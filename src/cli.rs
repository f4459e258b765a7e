//! CLI module - Command-line interface definitions and handlers

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::core::tokenizer::Tokenizer;
use crate::flows::export::{export_repo, ExportOptions};

/// repodigest - export a repository into a single AI-ready text bundle.
#[derive(Parser, Debug)]
#[command(name = "repodigest")]
#[command(
    author,
    version,
    about,
    long_about = r#"repodigest walks a repository, filters out noise and secrets, measures every
remaining file in tokens, lines and bytes, and writes one text bundle with
summaries by extension, directory and file.

Safety: files matching sensitive patterns (e.g. .env, *secret*, *.key) block
the export by default. Use --allow-secrets only if you understand the risk.

Exit codes:
    0  success
    1  invocation error (bad root path)
    2  safety violation (sensitive files blocked, nothing written)
    3  size limit exceeded (nothing written)

Examples:
    repodigest .
    repodigest . -o context.txt --max-bytes 2000000
    repodigest src --preview --json
    repodigest . --tokenizer words --no-gitignore
"#
)]
pub struct Cli {
    /// Path to the repository (default: current directory).
    #[arg(
        default_value = ".",
        value_name = "PATH",
        long_help = "Path to the repository to export (defaults to the current directory).\n\n\
All paths in the bundle are relative to this root and use '/' as separator."
    )]
    pub path: PathBuf,

    /// Output file path.
    #[arg(
        short,
        long,
        default_value = "repo_export.txt",
        value_name = "FILE",
        long_help = "Where to write the bundle.\n\n\
Nothing is written when the run is blocked by the safety gate, exceeds\n\
--max-bytes, or runs in --preview mode."
    )]
    pub output: PathBuf,

    /// Preview counts only; do not write output.
    #[arg(
        long,
        long_help = "Compute and print statistics (file count, token and byte totals, top\n\
extensions) without writing the bundle. The numbers match what a write run\n\
would put into the summary header."
    )]
    pub preview: bool,

    /// Emit preview statistics as JSON.
    #[arg(
        long,
        requires = "preview",
        long_help = "Print the preview statistics as pretty JSON instead of text.\n\n\
Only meaningful together with --preview."
    )]
    pub json: bool,

    /// Fail if collected total bytes exceed this limit.
    #[arg(
        long,
        value_name = "N",
        long_help = "Abort with exit code 3 when the collected total bytes exceed N.\n\n\
Applies in both preview and write mode; in write mode nothing is written."
    )]
    pub max_bytes: Option<u64>,

    /// Allow files that match sensitive patterns (NOT recommended).
    #[arg(
        long,
        long_help = "Include files matching the sensitive patterns instead of blocking the\n\
run. A warning listing the included files is printed to stderr."
    )]
    pub allow_secrets: bool,

    /// Do not respect .gitignore (default is to respect it).
    #[arg(
        long,
        long_help = "Skip loading the root .gitignore. Built-in exclusions (VCS metadata,\n\
dependency directories, binaries, caches) still apply."
    )]
    pub no_gitignore: bool,

    /// Tokenizer used for counting (auto/cl100k/words).
    #[arg(
        long,
        default_value = "auto",
        value_name = "NAME",
        long_help = "Select the tokenizer.\n\n\
Supported values:\n\
- auto (default): cl100k_base when available, otherwise word counting\n\
- cl100k: tiktoken cl100k_base encoding (precise)\n\
- words: whitespace-split word counting (approximate)\n\n\
The bundle header records which tokenizer produced the numbers."
    )]
    pub tokenizer: String,

    /// Disable colored output.
    #[arg(
        long,
        long_help = "Disable colored output. This is useful when piping to files or when your\n\
terminal does not support ANSI colors."
    )]
    pub no_color: bool,

    /// Quiet mode (suppress skip notices and advisory warnings).
    #[arg(
        short,
        long,
        long_help = "Suppress non-essential stderr output (skip notices, included-secrets\n\
warnings). Safety-gate and limit reports are still printed."
    )]
    pub quiet: bool,
}

/// Run the export and return the process exit code
pub fn run(cli: Cli) -> Result<i32> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    let tokenizer: Tokenizer = cli.tokenizer.parse().map_err(anyhow::Error::msg)?;

    let options = ExportOptions {
        allow_secrets: cli.allow_secrets,
        respect_gitignore: !cli.no_gitignore,
        max_bytes: cli.max_bytes,
        preview: cli.preview,
        json: cli.json,
        quiet: cli.quiet,
    };

    let status = export_repo(&cli.path, &cli.output, &options, tokenizer)?;
    Ok(status.code())
}
