//! Tracing subscriber setup for the binary.

use tracing_subscriber::EnvFilter;

/// Environment variable whose filter directives override `-v`.
pub(crate) const LOG_ENV: &str = "GOBLIN_HUNT_LOG";

/// Maps a `-v` count to a tracing directive.
pub(crate) const fn verbosity_to_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the global subscriber, writing to stderr.
///
/// `GOBLIN_HUNT_LOG` takes precedence over `verbosity` when set. Repeated
/// calls are ignored.
pub(crate) fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(verbosity_to_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .with_writer(std::io::stderr)
        .try_init();
}
