//! Run configuration for replacer
//!
//! A `RunConfig` is resolved once from the command line and never mutated
//! afterwards; every component receives it by reference.

use std::path::PathBuf;

/// Built-in exclusion globs, matched against entry base names.
///
/// This is configuration data, not logic: it is the default value for the
/// exclusion set and `--no-filter` clears it entirely. Version-control
/// directories, backup and editor swap files, compiled artifacts, and
/// common build output directories.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    ".git",
    ".svn",
    ".hg",
    "*.back",
    "*~",
    "*.swp",
    "*.pyc",
    "*.o",
    "*.a",
    "*.so",
    "build",
    "target",
    "node_modules",
    "__pycache__",
];

/// Immutable per-invocation settings.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Regex source string. Compiled (and validated) before any traversal.
    pub pattern: String,
    /// Replacement template; `$1` / `${name}` refer to capture groups.
    pub replacement: String,
    /// Explicit files to process. Non-empty means: bypass every filter.
    pub paths: Vec<PathBuf>,
    /// Base-name globs a file must match when non-empty.
    pub includes: Vec<String>,
    /// Relative-path globs that disqualify an entry.
    pub excludes: Vec<String>,
    /// Default exclusion globs; empty when `--no-filter` was given.
    pub default_excludes: Vec<String>,
    /// Skip dotfiles and dot-directories.
    pub skip_hidden: bool,
    /// Write changes back to disk. False is preview mode.
    pub commit: bool,
    /// Keep a `.back` copy of each modified file.
    pub backup: bool,
    /// Suppress informational output (diffs, trailer).
    pub quiet: bool,
    /// Resolved color choice for diff rendering.
    pub color_enabled: bool,
}

impl RunConfig {
    /// Preview-mode defaults for a pattern/replacement pair.
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
            paths: Vec::new(),
            includes: Vec::new(),
            excludes: Vec::new(),
            default_excludes: DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect(),
            skip_hidden: true,
            commit: false,
            backup: false,
            quiet: false,
            color_enabled: false,
        }
    }
}
