use anyhow::{Context, Result};
use regex::Regex;
use replacer::diff_formatter::{ColorScheme, DiffFormatter};
use replacer::file_processor::FileProcessor;
use replacer::selector::Selector;
use replacer::{cli, logger};

fn main() -> Result<()> {
    let config = cli::parse_args()?;
    logger::init_logging();

    // Compile before any traversal: a bad pattern must touch nothing.
    let regex = Regex::new(&config.pattern)
        .with_context(|| format!("invalid pattern '{}'", config.pattern))?;

    // The scheme is the single source of truth for styling; the override
    // makes forced colors survive a non-tty stdout.
    let scheme = ColorScheme::new(config.color_enabled);
    colored::control::set_override(scheme.enabled());

    let selector = Selector::new(&config)?;
    let formatter = DiffFormatter::new(scheme, &regex, &config.replacement);
    let processor = FileProcessor::new(&regex, &config.replacement, &config);

    let mut patched = 0usize;
    for path in selector.files() {
        match processor.process_file(&path) {
            Ok(Some(diff)) => {
                patched += 1;
                if !config.quiet {
                    print!("{}", formatter.format_file_diff(&diff));
                }
            }
            Ok(None) => {}
            Err(err) => {
                eprintln!("Cannot process {}: {:#}", path.display(), err);
            }
        }
    }

    if !config.commit && !config.quiet && patched > 0 {
        print!("{}", formatter.format_preview_trailer(patched));
    }

    Ok(())
}
