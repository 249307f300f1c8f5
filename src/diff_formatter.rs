//! Colorized before/after rendering
//!
//! Each changed file gets a `Patching:` header followed by an old/new pair
//! per changed line. Matched spans are highlighted in the old line and the
//! substituted spans in the new line. Lines of 100 characters or more are
//! truncated to a window around the first match; truncation affects only
//! what is printed, never what is written to disk.

use crate::file_processor::FileDiff;
use colored::Colorize;
use regex::Regex;
use std::borrow::Cow;
use std::path::Path;

/// Rendered width budget for a single diff line.
const MAX_RENDER_WIDTH: usize = 100;
/// Characters taken by the `... ` and ` ...` markers around a window.
const ELLIPSIS_OVERHEAD: usize = 8;

/// Immutable color palette, resolved once per invocation.
///
/// All styling goes through this value; nothing mutates a global palette.
/// Note that the `colored` crate still consults its own override, so a
/// caller forcing colors onto a non-tty must also call
/// `colored::control::set_override(true)` (main does this once).
#[derive(Debug, Clone, Copy)]
pub struct ColorScheme {
    enabled: bool,
}

impl ColorScheme {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    fn header_label(&self, text: &str) -> String {
        if self.enabled {
            text.blue().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn file_name(&self, text: &str) -> String {
        if self.enabled {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn removed_marker(&self) -> String {
        if self.enabled {
            "-- ".red().to_string()
        } else {
            "-- ".to_string()
        }
    }

    fn added_marker(&self) -> String {
        if self.enabled {
            "++ ".green().to_string()
        } else {
            "++ ".to_string()
        }
    }

    fn removed_span(&self, text: &str) -> String {
        if self.enabled {
            text.red().bold().underline().to_string()
        } else {
            text.to_string()
        }
    }

    fn added_span(&self, text: &str) -> String {
        if self.enabled {
            text.green().bold().underline().to_string()
        } else {
            text.to_string()
        }
    }

    fn emphasis(&self, text: &str) -> String {
        if self.enabled {
            text.yellow().bold().to_string()
        } else {
            text.to_string()
        }
    }
}

pub struct DiffFormatter<'a> {
    scheme: ColorScheme,
    regex: &'a Regex,
    replacement: &'a str,
}

impl<'a> DiffFormatter<'a> {
    pub fn new(scheme: ColorScheme, regex: &'a Regex, replacement: &'a str) -> Self {
        Self {
            scheme,
            regex,
            replacement,
        }
    }

    /// Render the full diff block for one file.
    pub fn format_file_diff(&self, diff: &FileDiff) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "{}{}\n",
            self.scheme.header_label("Patching: "),
            self.scheme.file_name(&display_path(&diff.path)),
        ));

        for change in &diff.changes {
            let line = self.shorten_line(&change.old);
            output.push_str(&format!(
                "{}{}\n",
                self.scheme.removed_marker(),
                self.highlight_matches(&line),
            ));
            output.push_str(&format!(
                "{}{}\n",
                self.scheme.added_marker(),
                self.highlight_replacements(&line),
            ));
            output.push('\n');
        }

        output
    }

    /// Trailer shown after a preview run with pending changes.
    pub fn format_preview_trailer(&self, file_count: usize) -> String {
        let noun = if file_count == 1 { "file" } else { "files" };
        format!(
            "{} {} to patch. Re-run with {} to apply the changes, add {} to keep a copy of each original.\n",
            file_count,
            noun,
            self.scheme.emphasis("--go"),
            self.scheme.emphasis("--backup"),
        )
    }

    /// The old line with every matched span highlighted.
    fn highlight_matches(&self, line: &str) -> String {
        let mut output = String::new();
        let mut last = 0;
        for m in self.regex.find_iter(line) {
            output.push_str(&line[last..m.start()]);
            output.push_str(&self.scheme.removed_span(m.as_str()));
            last = m.end();
        }
        output.push_str(&line[last..]);
        output
    }

    /// The new line, built by expanding the replacement template for each
    /// match and highlighting the substituted spans.
    fn highlight_replacements(&self, line: &str) -> String {
        let mut output = String::new();
        let mut last = 0;
        for caps in self.regex.captures_iter(line) {
            let Some(m) = caps.get(0) else { continue };
            output.push_str(&line[last..m.start()]);

            let mut expanded = String::new();
            caps.expand(self.replacement, &mut expanded);
            output.push_str(&self.scheme.added_span(&expanded));
            last = m.end();
        }
        output.push_str(&line[last..]);
        output
    }

    /// Truncate a long line to a window centred on the first match.
    ///
    /// All arithmetic is in characters, not bytes: the width budget is a
    /// character count and multibyte text must never split mid-character.
    fn shorten_line<'l>(&self, line: &'l str) -> Cow<'l, str> {
        if line.chars().count() < MAX_RENDER_WIDTH {
            return Cow::Borrowed(line);
        }

        let Some(m) = self.regex.find(line) else {
            return Cow::Owned(line.chars().take(MAX_RENDER_WIDTH).collect());
        };

        let match_chars = m.as_str().chars().count();
        if match_chars >= MAX_RENDER_WIDTH {
            return Cow::Owned(line.chars().take(MAX_RENDER_WIDTH).collect());
        }

        let padding = ((MAX_RENDER_WIDTH - match_chars) / 2).saturating_sub(ELLIPSIS_OVERHEAD);
        let start = step_chars_back(line, m.start(), padding);
        let end = step_chars_forward(line, m.end(), padding);

        Cow::Owned(format!("... {} ...", &line[start..end]))
    }
}

/// Paths are shown relative to the invocation root; a leading `./` from the
/// walk is dropped.
fn display_path(path: &Path) -> String {
    path.strip_prefix("./")
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}

/// Byte index `count` characters before `index`, which must sit on a
/// character boundary.
fn step_chars_back(s: &str, index: usize, count: usize) -> usize {
    s[..index]
        .char_indices()
        .rev()
        .take(count)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(index)
}

/// Byte index `count` characters after `index`, clamped to the end.
fn step_chars_forward(s: &str, index: usize, count: usize) -> usize {
    s[index..]
        .char_indices()
        .nth(count)
        .map(|(i, _)| index + i)
        .unwrap_or(s.len())
}
