//! Sibling backup files
//!
//! Before a file is overwritten in commit mode, its original content can be
//! preserved as `<file>-NNN.back` next to it, where NNN is a random
//! three-digit suffix so repeated runs in the same tree do not collide.
//! Backups are write-once; replacer never tracks them afterwards.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const SUFFIX_ATTEMPTS: usize = 16;

/// Write `contents` to a fresh `<path>-NNN.back` sibling and return its path.
pub fn create_backup(path: &Path, contents: &str) -> Result<PathBuf> {
    for _ in 0..SUFFIX_ATTEMPTS {
        let candidate = backup_path(path, random_suffix());
        if candidate.exists() {
            continue;
        }

        fs::write(&candidate, contents)
            .with_context(|| format!("failed to write backup {}", candidate.display()))?;
        tracing::debug!(backup = %candidate.display(), "wrote backup");
        return Ok(candidate);
    }

    bail!("could not find a free backup name for {}", path.display())
}

fn backup_path(path: &Path, suffix: u32) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!("-{}.back", suffix));
    path.with_file_name(name)
}

fn random_suffix() -> u32 {
    100 + (Uuid::new_v4().as_u128() % 900) as u32
}
