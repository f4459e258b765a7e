//! Path normalization utilities
//!
//! Every path the pipeline emits is relative to the export root and uses '/'
//! as separator, regardless of platform. "." stands for the root itself.

use std::path::Path;

/// Sentinel extension bucket for files without an extension
pub const NO_EXT: &str = "<no-ext>";

/// Normalize a path to use '/' as separator (for cross-platform consistency)
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Make a path relative to the root directory
pub fn make_relative(path: &Path, root: &Path) -> Option<String> {
    path.strip_prefix(root).ok().map(normalize_path)
}

/// Containing directory of a relative file path ("." when at root)
pub fn parent_dir(rel_path: &str) -> &str {
    match rel_path.rsplit_once('/') {
        Some((dir, _)) => dir,
        None => ".",
    }
}

/// Bare file or directory name of a relative path
pub fn base_name(rel_path: &str) -> &str {
    rel_path.rsplit('/').next().unwrap_or(rel_path)
}

/// Ancestor directory chain for a file path, from the root down to the
/// containing directory, both inclusive. Always starts with ".".
pub fn ancestor_chain(rel_path: &str) -> Vec<String> {
    let mut chain = vec![".".to_string()];
    let dir = parent_dir(rel_path);
    if dir != "." {
        let mut acc = String::new();
        for part in dir.split('/') {
            if !acc.is_empty() {
                acc.push('/');
            }
            acc.push_str(part);
            chain.push(acc.clone());
        }
    }
    chain
}

/// Normalized extension bucket: lowercased with a leading dot, or the
/// `<no-ext>` sentinel. Dotfiles like ".env" count as extensionless.
pub fn normalized_extension(rel_path: &str) -> String {
    Path::new(rel_path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_else(|| NO_EXT.to_string())
}
