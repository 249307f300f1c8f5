use crate::config::{RunConfig, DEFAULT_EXCLUDES};
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "replacer")]
#[command(about = "Replace a regex pattern across files, previewing changes by default")]
#[command(long_about = "Replacer applies a regex substitution line-by-line to every eligible
text file under the current directory, or to an explicit list of files.

By default nothing is written: the tool prints a colorized diff of what
would change. Pass --go to commit, and --backup to keep a .back copy of
each modified file.

Hidden entries, version-control directories, backups, editor swap files
and compiled artifacts are skipped unless told otherwise; binary files
(NUL byte in the first 1024 bytes) are always skipped during traversal.
Files named explicitly on the command line bypass every filter.

EXAMPLES:
  replacer 'toto' 'titi'                     Preview everywhere under .
  replacer 'toto' 'titi' --go                Apply the changes
  replacer 'toto' 'titi' --go --backup       Apply, keeping *.back copies
  replacer '(\\w+)_tmp' '${1}_final' --go     Capture groups: $1, ${name}
  replacer 'old' 'new' --include '*.rs'      Only .rs files
  replacer 'old' 'new' --exclude 'vendor/*'  Skip vendor/ trees
  replacer 'old' 'new' src/main.rs           Only this file, no filters")]
#[command(version)]
struct Cli {
    /// Regular expression to search for
    #[arg(value_name = "PATTERN")]
    pattern: String,

    /// Replacement template ($1 or ${name} refer to capture groups)
    #[arg(value_name = "REPLACEMENT")]
    replacement: String,

    /// Explicit files to patch; all filters are bypassed for these
    #[arg(value_name = "PATHS")]
    paths: Vec<PathBuf>,

    /// Only replace in files whose name matches GLOB (repeatable)
    #[arg(long = "include", value_name = "GLOB")]
    include: Vec<String>,

    /// Skip entries whose relative path matches GLOB (repeatable);
    /// use 'dir/*' to prune a directory at any depth
    #[arg(long = "exclude", value_name = "GLOB")]
    exclude: Vec<String>,

    /// Do not skip hidden files and directories
    #[arg(long = "no-skip-hidden")]
    no_skip_hidden: bool,

    /// Disable the built-in default exclusions
    #[arg(long = "no-filter")]
    no_filter: bool,

    /// Keep a .back copy of each file before overwriting it
    #[arg(long)]
    backup: bool,

    /// Commit the changes instead of just printing them
    #[arg(long)]
    go: bool,

    /// Preview only; always wins over --go, whatever the flag order
    #[arg(short = 'n', long = "dry-run")]
    dry_run: bool,

    /// Force colorized output even when stdout is not a terminal
    #[arg(long, conflicts_with = "no_color")]
    color: bool,

    /// Never colorize the output
    #[arg(long = "no-color")]
    no_color: bool,

    /// Do not print diffs; writes still happen with --go
    #[arg(short, long)]
    quiet: bool,
}

/// Parse the command line into a resolved, immutable `RunConfig`.
pub fn parse_args() -> Result<RunConfig> {
    resolve(Cli::parse())
}

fn resolve(cli: Cli) -> Result<RunConfig> {
    let color_enabled = if cli.color {
        true
    } else if cli.no_color {
        false
    } else {
        auto_color()
    };

    let default_excludes = if cli.no_filter {
        Vec::new()
    } else {
        DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect()
    };

    Ok(RunConfig {
        pattern: cli.pattern,
        replacement: cli.replacement,
        paths: cli.paths,
        includes: cli.include,
        excludes: cli.exclude,
        default_excludes,
        skip_hidden: !cli.no_skip_hidden,
        commit: cli.go && !cli.dry_run,
        backup: cli.backup,
        quiet: cli.quiet,
        color_enabled,
    })
}

fn auto_color() -> bool {
    // NO_COLOR convention: https://no-color.org/
    std::env::var_os("NO_COLOR").is_none() && atty::is(atty::Stream::Stdout)
}
