//! Candidate file selection
//!
//! The selector walks a directory tree and yields the files eligible for
//! substitution. Filters run as an ordered pipeline where the first matching
//! rule wins: hidden-entry skip, directory exclusion, default exclusions,
//! include globs, exclude globs, then binary detection. Explicit paths given
//! on the command line bypass the pipeline entirely.
//!
//! Glob matching uses the default `glob` options, so `*` may cross `/` in a
//! relative-path pattern, and patterns are compiled once up front: an
//! invalid glob aborts before any file is looked at.

use crate::config::RunConfig;
use anyhow::{Context, Result};
use glob::Pattern;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// How many leading bytes to sniff when classifying a file as binary.
const BINARY_SNIFF_LEN: u64 = 1024;

/// An exclusion rule: the compiled glob plus, for patterns containing a
/// path separator, the first segment used to prune whole directories.
struct ExcludeRule {
    pattern: Pattern,
    dir_root: Option<String>,
}

pub struct Selector {
    root: PathBuf,
    paths: Vec<PathBuf>,
    includes: Vec<Pattern>,
    excludes: Vec<ExcludeRule>,
    default_excludes: Vec<Pattern>,
    skip_hidden: bool,
}

impl Selector {
    /// Build a selector rooted at the current working directory.
    pub fn new(config: &RunConfig) -> Result<Self> {
        Self::rooted(config, ".")
    }

    /// Build a selector walking `root` instead of the working directory.
    pub fn rooted(config: &RunConfig, root: impl Into<PathBuf>) -> Result<Self> {
        let includes = compile_globs(&config.includes)?;
        let default_excludes = compile_globs(&config.default_excludes)?;

        let mut excludes = Vec::with_capacity(config.excludes.len());
        for raw in &config.excludes {
            let pattern = Pattern::new(raw)
                .with_context(|| format!("invalid exclude pattern '{}'", raw))?;
            let dir_root = raw
                .split_once('/')
                .map(|(first, _)| first.to_string());
            excludes.push(ExcludeRule { pattern, dir_root });
        }

        Ok(Self {
            root: root.into(),
            paths: config.paths.clone(),
            includes,
            excludes,
            default_excludes,
            skip_hidden: config.skip_hidden,
        })
    }

    /// Lazily yield eligible files, one at a time.
    ///
    /// With explicit paths this is exactly those paths, unfiltered: the user
    /// asked for them by name. Unreadable entries are reported and skipped
    /// so a partially-inaccessible tree stays usable.
    pub fn files(&self) -> Box<dyn Iterator<Item = PathBuf> + '_> {
        if !self.paths.is_empty() {
            return Box::new(self.paths.iter().cloned());
        }

        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .into_iter()
            .filter_entry(move |entry| self.keep_entry(entry));

        Box::new(walker.filter_map(move |res| match res {
            Ok(entry) if entry.file_type().is_file() => match is_binary(entry.path()) {
                Ok(true) => {
                    tracing::debug!(path = %entry.path().display(), "skipping binary file");
                    None
                }
                Ok(false) => Some(entry.into_path()),
                Err(err) => {
                    eprintln!("Cannot read {}: {:#}", entry.path().display(), err);
                    None
                }
            },
            Ok(_) => None,
            Err(err) => {
                eprintln!("Cannot traverse: {}", err);
                None
            }
        }))
    }

    /// The filter pipeline. Returning false on a directory prunes its
    /// whole subtree.
    fn keep_entry(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();
        let is_dir = entry.file_type().is_dir();

        if self.skip_hidden && name.starts_with('.') {
            tracing::debug!(path = %entry.path().display(), "skipping hidden entry");
            return false;
        }

        if is_dir
            && self
                .excludes
                .iter()
                .any(|rule| rule.dir_root.as_deref() == Some(name.as_ref()))
        {
            tracing::debug!(path = %entry.path().display(), "pruning excluded directory");
            return false;
        }

        if self.default_excludes.iter().any(|p| p.matches(&name)) {
            tracing::debug!(path = %entry.path().display(), "skipping default exclusion");
            return false;
        }

        // Include globs constrain files only; directories are always
        // descended so nested matches are found.
        if !is_dir && !self.includes.is_empty() && !self.includes.iter().any(|p| p.matches(&name)) {
            return false;
        }

        let rel = self.relative_path(entry.path());
        if self.excludes.iter().any(|rule| rule.pattern.matches(&rel)) {
            tracing::debug!(path = %entry.path().display(), "skipping excluded path");
            return false;
        }

        true
    }

    fn relative_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .into_owned()
    }
}

fn compile_globs(raw: &[String]) -> Result<Vec<Pattern>> {
    raw.iter()
        .map(|g| Pattern::new(g).with_context(|| format!("invalid glob pattern '{}'", g)))
        .collect()
}

/// NUL-byte heuristic: a file is binary when its first 1024 bytes contain a
/// NUL. Empty files are text.
pub fn is_binary(path: &Path) -> Result<bool> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;

    let mut prefix = Vec::with_capacity(BINARY_SNIFF_LEN as usize);
    file.take(BINARY_SNIFF_LEN)
        .read_to_end(&mut prefix)
        .with_context(|| format!("failed to read {}", path.display()))?;

    Ok(prefix.contains(&0))
}
