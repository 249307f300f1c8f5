//! End-to-end tests of the replacer binary.
//!
//! Every test runs in its own temp directory; the binary walks that
//! directory, so no test touches the real working tree. Backup suffixes
//! are random, so tests only assert the `*.back` shape, never the digits.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn replacer() -> Command {
    Command::cargo_bin("replacer").unwrap()
}

fn write(root: &Path, rel: &str, contents: &[u8]) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn read(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap()
}

#[test]
fn preview_shows_diff_without_modifying() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", b"Top: old is nice\n");

    replacer()
        .current_dir(dir.path())
        .args(["old", "new"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Patching: a.txt"))
        .stdout(predicate::str::contains("-- Top: old is nice"))
        .stdout(predicate::str::contains("++ Top: new is nice"));

    assert_eq!(read(dir.path(), "a.txt"), "Top: old is nice\n");
}

#[test]
fn preview_is_idempotent() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", b"old old\n");

    for _ in 0..3 {
        replacer()
            .current_dir(dir.path())
            .args(["old", "new"])
            .assert()
            .success();
    }

    assert_eq!(read(dir.path(), "a.txt"), "old old\n");
}

#[test]
fn go_commits_the_substitution() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", b"Top: old is nice\n");

    replacer()
        .current_dir(dir.path())
        .args(["old", "new", "--go"])
        .assert()
        .success();

    assert_eq!(read(dir.path(), "a.txt"), "Top: new is nice\n");
}

#[test]
fn dry_run_always_wins_over_go() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", b"old\n");

    replacer()
        .current_dir(dir.path())
        .args(["old", "new", "--go", "--dry-run"])
        .assert()
        .success();
    assert_eq!(read(dir.path(), "a.txt"), "old\n");

    replacer()
        .current_dir(dir.path())
        .args(["old", "new", "-n", "--go"])
        .assert()
        .success();
    assert_eq!(read(dir.path(), "a.txt"), "old\n");
}

#[test]
fn non_matching_file_is_silent() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", b"nothing to see\n");

    replacer()
        .current_dir(dir.path())
        .args(["old", "new", "--go"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(read(dir.path(), "a.txt"), "nothing to see\n");
}

#[test]
fn hidden_files_skipped_unless_asked() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), ".hidden/inner.txt", b"old\n");

    replacer()
        .current_dir(dir.path())
        .args(["old", "new", "--go"])
        .assert()
        .success();
    assert_eq!(read(dir.path(), ".hidden/inner.txt"), "old\n");

    replacer()
        .current_dir(dir.path())
        .args(["old", "new", "--go", "--no-skip-hidden"])
        .assert()
        .success();
    assert_eq!(read(dir.path(), ".hidden/inner.txt"), "new\n");
}

#[test]
fn include_glob_limits_eligible_files() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", b"old\n");
    write(dir.path(), "README", b"old\n");

    replacer()
        .current_dir(dir.path())
        .args(["old", "new", "--go", "--include", "*.txt"])
        .assert()
        .success();

    assert_eq!(read(dir.path(), "a.txt"), "new\n");
    assert_eq!(read(dir.path(), "README"), "old\n");
}

#[test]
fn exclude_glob_skips_matching_files() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", b"old\n");
    write(dir.path(), "README", b"old\n");

    replacer()
        .current_dir(dir.path())
        .args(["old", "new", "--go", "--exclude", "*.txt"])
        .assert()
        .success();

    assert_eq!(read(dir.path(), "a.txt"), "old\n");
    assert_eq!(read(dir.path(), "README"), "new\n");
}

#[test]
fn directory_exclusion_prunes_at_any_depth() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "vendor/one.js", b"old\n");
    write(dir.path(), "packages/foo/vendor/two.js", b"old\n");
    write(dir.path(), "packages/foo/keep.js", b"old\n");

    replacer()
        .current_dir(dir.path())
        .args(["old", "new", "--go", "--exclude", "vendor/*"])
        .assert()
        .success();

    assert_eq!(read(dir.path(), "vendor/one.js"), "old\n");
    assert_eq!(read(dir.path(), "packages/foo/vendor/two.js"), "old\n");
    assert_eq!(read(dir.path(), "packages/foo/keep.js"), "new\n");
}

#[test]
fn binary_files_are_never_touched_or_reported() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "data.bin", b"old\0old\n");

    replacer()
        .current_dir(dir.path())
        .args(["old", "new", "--go"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(
        fs::read(dir.path().join("data.bin")).unwrap(),
        b"old\0old\n"
    );
}

#[test]
fn default_filters_skip_generated_artifacts() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "libfoo.so", b"old\n");
    write(dir.path(), "a.txt-123.back", b"old\n");
    write(dir.path(), "a.txt", b"old\n");

    replacer()
        .current_dir(dir.path())
        .args(["old", "new", "--go"])
        .assert()
        .success();

    assert_eq!(read(dir.path(), "libfoo.so"), "old\n");
    assert_eq!(read(dir.path(), "a.txt-123.back"), "old\n");
    assert_eq!(read(dir.path(), "a.txt"), "new\n");
}

#[test]
fn no_filter_processes_everything() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "libfoo.so", b"old\n");

    replacer()
        .current_dir(dir.path())
        .args(["old", "new", "--go", "--no-filter"])
        .assert()
        .success();

    assert_eq!(read(dir.path(), "libfoo.so"), "new\n");
}

#[test]
fn backup_holds_original_content() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", b"Top: old is nice\n");

    replacer()
        .current_dir(dir.path())
        .args(["old", "new", "--go", "--backup"])
        .assert()
        .success();

    assert_eq!(read(dir.path(), "a.txt"), "Top: new is nice\n");

    let backup = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .find(|name| name.starts_with("a.txt-") && name.ends_with(".back"))
        .expect("a backup file should exist");
    let digits = &backup["a.txt-".len()..backup.len() - ".back".len()];
    assert!(digits.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(read(dir.path(), &backup), "Top: old is nice\n");
}

#[test]
fn no_backup_written_without_go() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", b"old\n");

    replacer()
        .current_dir(dir.path())
        .args(["old", "new", "--backup"])
        .assert()
        .success();

    let back_files = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".back"))
        .count();
    assert_eq!(back_files, 0);
    assert_eq!(read(dir.path(), "a.txt"), "old\n");
}

#[test]
fn explicit_path_bypasses_filters() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "keep.back", b"old\n");

    // *.back is in the default exclusions, but naming it wins.
    replacer()
        .current_dir(dir.path())
        .args(["old", "new", "--go", "keep.back"])
        .assert()
        .success();

    assert_eq!(read(dir.path(), "keep.back"), "new\n");
}

#[test]
fn long_lines_truncated_in_preview_only() {
    let dir = TempDir::new().unwrap();
    let line = format!("{}old{}\n", "x".repeat(80), "y".repeat(80));
    write(dir.path(), "a.txt", line.as_bytes());

    let output = replacer()
        .current_dir(dir.path())
        .args(["old", "new"])
        .assert()
        .success()
        .stdout(predicate::str::contains("... "))
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).unwrap();
    let rendered = stdout
        .lines()
        .find(|l| l.starts_with("-- "))
        .expect("an old line should be rendered");
    assert!(rendered.contains("old"));
    assert!(rendered.chars().count() <= 104, "got {} chars", rendered.chars().count());

    // On-disk content is untouched by rendering, and a commit writes it in full.
    replacer()
        .current_dir(dir.path())
        .args(["old", "new", "--go"])
        .assert()
        .success();
    let expected = format!("{}new{}\n", "x".repeat(80), "y".repeat(80));
    assert_eq!(read(dir.path(), "a.txt"), expected);
}

#[test]
fn capture_groups_expand_in_replacement() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", b"toto42\n");

    replacer()
        .current_dir(dir.path())
        .args([r"(to)to(\d+)", "${1}ta$2", "--go"])
        .assert()
        .success();

    assert_eq!(read(dir.path(), "a.txt"), "tota42\n");
}

#[test]
fn quiet_suppresses_output_but_still_writes() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", b"old\n");

    replacer()
        .current_dir(dir.path())
        .args(["old", "new", "--go", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(read(dir.path(), "a.txt"), "new\n");
}

#[test]
fn preview_prints_go_trailer() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", b"old\n");

    replacer()
        .current_dir(dir.path())
        .args(["old", "new"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--go"))
        .stdout(predicate::str::contains("--backup"));
}

#[test]
fn invalid_regex_fails_before_touching_files() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", b"old\n");

    replacer()
        .current_dir(dir.path())
        .args(["(old", "new", "--go"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid pattern"));

    assert_eq!(read(dir.path(), "a.txt"), "old\n");
}

#[test]
fn invalid_exclude_glob_is_fatal() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", b"old\n");

    replacer()
        .current_dir(dir.path())
        .args(["old", "new", "--go", "--exclude", "["])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid"));

    assert_eq!(read(dir.path(), "a.txt"), "old\n");
}

#[test]
fn unreadable_explicit_file_reported_and_run_continues() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "good.txt", b"old\n");

    replacer()
        .current_dir(dir.path())
        .args(["old", "new", "--go", "missing.txt", "good.txt"])
        .assert()
        .success()
        .stderr(predicate::str::contains("missing.txt"));

    assert_eq!(read(dir.path(), "good.txt"), "new\n");
}

#[test]
fn crlf_line_endings_survive_commit() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.txt", b"old line\r\nkeep\r\n");

    replacer()
        .current_dir(dir.path())
        .args(["old", "new", "--go"])
        .assert()
        .success();

    assert_eq!(read(dir.path(), "a.txt"), "new line\r\nkeep\r\n");
}
