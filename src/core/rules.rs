//! Rule engine - decides which files are excluded, ignored or sensitive
//!
//! Four independent rule sources are consulted with a fixed precedence
//! (first match wins):
//! 1. built-in exclusion globs, matched against every path component
//! 2. ignore-file patterns, matched against the whole relative path
//! 3. built-in extension blocklist
//! 4. sensitive-name patterns, only when the caller asks for them
//!
//! Sensitivity is evaluated separately from ordinary ignoring so the safety
//! gate can report and override it independently of noise filtering.
//!
//! The rule lists are plain data injected at construction; tests can hand in
//! their own RuleSet instead of the defaults.

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::fs;
use std::path::Path;

use crate::core::error::ExportError;
use crate::core::paths::normalized_extension;

/// Built-in exclusion globs, matched against bare path components.
/// Covers VCS metadata, OS artifacts, dependency and build directories,
/// caches, logs, lockfiles and common secret-file suffixes.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    // Version control
    ".git",
    ".svn",
    ".hg",
    ".bzr",
    // OS generated files
    ".DS_Store",
    "Thumbs.db",
    "desktop.ini",
    // Python
    "__pycache__",
    "*.pyc",
    "*.pyo",
    "*.pyd",
    ".Python",
    "pip-log.txt",
    "pip-delete-this-directory.txt",
    ".venv",
    "venv",
    "ENV",
    "env",
    ".pytest_cache",
    ".mypy_cache",
    ".tox",
    "htmlcov",
    ".coverage",
    ".coverage.*",
    "*.egg-info",
    "dist",
    "build",
    "wheels",
    ".eggs",
    "*.egg",
    // Node.js / JavaScript
    "node_modules",
    "npm-debug.log*",
    "yarn-debug.log*",
    "yarn-error.log*",
    ".npm",
    ".yarn",
    ".pnp",
    ".pnp.js",
    "bower_components",
    "jspm_packages",
    // IDE and editors
    ".idea",
    ".vscode",
    "*.swp",
    "*.swo",
    "*~",
    ".project",
    ".classpath",
    ".settings",
    "*.sublime-project",
    "*.sublime-workspace",
    // Build outputs
    "target",
    "out",
    "bin",
    "obj",
    "*.class",
    "*.jar",
    "*.war",
    "*.ear",
    "*.dll",
    "*.exe",
    "*.o",
    "*.so",
    "*.dylib",
    // Logs and databases. Plain *.log files are left to ignore-file rules so
    // that disabling the ignore file really brings them back.
    "*.sql",
    "*.sqlite",
    "*.db",
    "logs",
    "log",
    // Temporary files
    "*.tmp",
    "*.temp",
    "*.bak",
    "*.backup",
    "*.cache",
    ".cache",
    "tmp",
    "temp",
    // Security sensitive files
    "*.key",
    "*.pem",
    "*.p12",
    "*.pfx",
    "secrets",
    "credentials",
    // Documentation builds
    "_build",
    "site",
    "docs/_build",
    // Package manager locks (usually not needed for understanding code)
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "Pipfile.lock",
    "poetry.lock",
    "composer.lock",
    // Other
    ".sass-cache",
    ".next",
    ".nuxt",
    ".turbo",
    ".docusaurus",
    ".cache-loader",
    "vendor",
    "vendors",
];

/// Extensions never worth bundling: binaries, archives, documents,
/// compiled artifacts, large data, fonts and source maps
pub const DEFAULT_EXCLUDE_EXTENSIONS: &[&str] = &[
    // Binary files
    ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".ico", ".svg", ".mp3", ".mp4", ".avi", ".mov",
    ".wmv", ".flv", ".zip", ".tar", ".gz", ".rar", ".7z", ".pdf", ".doc", ".docx", ".xls",
    ".xlsx", ".ppt", ".pptx", // Compiled files
    ".pyc", ".pyo", ".class", ".o", ".so", ".dll", ".exe", // Lock files
    ".lock", // Large data files
    ".csv", ".tsv", ".parquet", ".feather", ".h5", ".hdf5", // Font files
    ".ttf", ".otf", ".woff", ".woff2", ".eot", // Map files
    ".map",
];

/// Name patterns that suggest credentials or other secrets
pub const DEFAULT_SENSITIVE_PATTERNS: &[&str] = &[
    "*secret*",
    "*password*",
    "*token*",
    "*key*",
    "*.pem",
    "*.key",
    "*.cert",
    "*.crt",
    ".env*",
    "*.env",
];

/// Name of the ignore file read from the export root
pub const IGNORE_FILE: &str = ".gitignore";

/// Classification of one candidate path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Accepted,
    Ignored,
    Sensitive,
}

/// Immutable rule lists handed to the engine at construction
#[derive(Debug, Clone)]
pub struct RuleSet {
    /// Globs matched against bare path components
    pub excludes: Vec<String>,
    /// Lowercased extensions (with leading dot) to drop
    pub exclude_extensions: Vec<String>,
    /// Globs matched case-insensitively against the whole relative path
    pub sensitive_patterns: Vec<String>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            excludes: DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect(),
            exclude_extensions: DEFAULT_EXCLUDE_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            sensitive_patterns: DEFAULT_SENSITIVE_PATTERNS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Compiled rule engine, read-only for the duration of one export run
#[derive(Debug)]
pub struct RuleEngine {
    component_excludes: GlobSet,
    exclude_extensions: Vec<String>,
    sensitive: GlobSet,
    ignore: GlobSet,
}

impl RuleEngine {
    /// Compile a rule set plus the loaded ignore-file patterns.
    ///
    /// Sensitive patterns are lowercased at build time and matched against
    /// lowercased paths, mirroring case-insensitive shell globbing.
    pub fn new(rules: &RuleSet, ignore_patterns: &[String]) -> Result<Self, ExportError> {
        let lowered: Vec<String> = rules
            .sensitive_patterns
            .iter()
            .map(|p| p.to_lowercase())
            .collect();
        Ok(Self {
            component_excludes: build_glob_set(&rules.excludes)?,
            exclude_extensions: rules
                .exclude_extensions
                .iter()
                .map(|e| e.to_lowercase())
                .collect(),
            sensitive: build_glob_set(&lowered)?,
            ignore: build_glob_set(ignore_patterns)?,
        })
    }

    /// True when a bare file or directory name matches a built-in exclusion
    /// glob. The walker uses this to prune directories before descending.
    pub fn is_excluded_name(&self, name: &str) -> bool {
        self.component_excludes.is_match(name)
    }

    /// Minified-asset names are skipped during traversal only; they never
    /// reach classification.
    pub fn is_minified_name(name: &str) -> bool {
        name.contains(".min.") || name.ends_with(".min.js") || name.ends_with(".min.css")
    }

    /// Classify a full relative path.
    ///
    /// Precedence is fixed: built-in component match, then ignore-file
    /// patterns, then the extension blocklist, then (when `check_sensitive`)
    /// the sensitive patterns. Note the consequence: secret-like extensions
    /// such as .key/.pem are caught by the earlier rules, so they come back
    /// Ignored rather than Sensitive.
    pub fn classify(&self, rel_path: &str, check_sensitive: bool) -> Classification {
        if rel_path
            .split('/')
            .any(|part| self.component_excludes.is_match(part))
        {
            return Classification::Ignored;
        }
        if self.ignore.is_match(rel_path) {
            return Classification::Ignored;
        }
        let ext = normalized_extension(rel_path);
        if self.exclude_extensions.iter().any(|e| *e == ext) {
            return Classification::Ignored;
        }
        if check_sensitive && self.is_sensitive(rel_path) {
            return Classification::Sensitive;
        }
        Classification::Accepted
    }

    /// Sensitive-pattern check alone, matched case-insensitively against the
    /// whole relative path
    pub fn is_sensitive(&self, rel_path: &str) -> bool {
        self.sensitive.is_match(rel_path.to_lowercase())
    }
}

/// Load ignore patterns from `<root>/.gitignore`, dropping comment and blank
/// lines. A missing or unreadable file yields no patterns.
pub fn load_ignore_file(root: &Path) -> Vec<String> {
    match fs::read_to_string(root.join(IGNORE_FILE)) {
        Ok(text) => text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(String::from)
            .collect(),
        Err(_) => Vec::new(),
    }
}

fn build_glob_set(patterns: &[String]) -> Result<GlobSet, ExportError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| ExportError::Glob {
            pattern: pattern.clone(),
            source: e,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| ExportError::Glob {
        pattern: patterns.join(","),
        source: e,
    })
}
