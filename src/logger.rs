//! Logging setup for replacer
//!
//! Diagnostics go to stderr so they never mix with diff output on stdout.
//! The filter is taken from RUST_LOG; without it only warnings show.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("replacer=warn"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .with_target(false)
        .try_init();
}
