//! The substitution engine
//!
//! Applies one regex substitution to one file: read the lines, compute the
//! replaced content, and report which lines changed. In commit mode the new
//! content is written through a temp file in the same directory so the
//! original is replaced in a single rename, after an optional backup.
//!
//! Line terminators are preserved byte-for-byte: substitution runs on the
//! line content with the terminator stripped, so `$` anchors behave per
//! line, and the original `\n` / `\r\n` is re-attached afterwards.

use crate::backup_manager;
use crate::config::RunConfig;
use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// One line whose substituted form differs from the original.
/// Contents carry no terminator.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChange {
    pub line_number: usize,
    pub old: String,
    pub new: String,
}

/// All changed lines of a single file.
#[derive(Debug)]
pub struct FileDiff {
    pub path: PathBuf,
    pub changes: Vec<LineChange>,
}

pub struct FileProcessor<'a> {
    regex: &'a Regex,
    replacement: &'a str,
    config: &'a RunConfig,
}

impl<'a> FileProcessor<'a> {
    pub fn new(regex: &'a Regex, replacement: &'a str, config: &'a RunConfig) -> Self {
        Self {
            regex,
            replacement,
            config,
        }
    }

    /// Process one file. Returns `Ok(None)` when nothing matched; errors are
    /// local to this file and the caller decides whether to continue.
    pub fn process_file(&self, path: &Path) -> Result<Option<FileDiff>> {
        let original = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        let mut new_content = String::with_capacity(original.len());
        let mut changes = Vec::new();

        for (idx, raw_line) in original.split_inclusive('\n').enumerate() {
            let (content, terminator) = split_terminator(raw_line);
            let replaced = self.regex.replace_all(content, self.replacement);

            if replaced != content {
                changes.push(LineChange {
                    line_number: idx + 1,
                    old: content.to_string(),
                    new: replaced.to_string(),
                });
            }

            new_content.push_str(&replaced);
            new_content.push_str(terminator);
        }

        if changes.is_empty() {
            return Ok(None);
        }

        tracing::debug!(
            path = %path.display(),
            lines = changes.len(),
            commit = self.config.commit,
            "substitution produced changes"
        );

        if self.config.commit {
            if self.config.backup {
                backup_manager::create_backup(path, &original)?;
            }
            write_in_place(path, &new_content)?;
        }

        Ok(Some(FileDiff {
            path: path.to_path_buf(),
            changes,
        }))
    }
}

/// Replace `path`'s content via a temp file in the same directory, keeping
/// the original permissions.
fn write_in_place(path: &Path, contents: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut temp_file = NamedTempFile::new_in(parent)
        .with_context(|| format!("failed to create temp file in {}", parent.display()))?;

    temp_file
        .write_all(contents.as_bytes())
        .with_context(|| format!("failed to write new content for {}", path.display()))?;

    let permissions = fs::metadata(path)
        .with_context(|| format!("failed to read metadata of {}", path.display()))?
        .permissions();
    fs::set_permissions(temp_file.path(), permissions)
        .with_context(|| format!("failed to set permissions for {}", path.display()))?;

    temp_file
        .persist(path)
        .map_err(|err| err.error)
        .with_context(|| format!("failed to replace {}", path.display()))?;

    tracing::debug!(path = %path.display(), "wrote substituted content");
    Ok(())
}

fn split_terminator(line: &str) -> (&str, &str) {
    if let Some(stripped) = line.strip_suffix("\r\n") {
        (stripped, "\r\n")
    } else if let Some(stripped) = line.strip_suffix('\n') {
        (stripped, "\n")
    } else {
        (line, "")
    }
}
