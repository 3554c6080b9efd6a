//! Diagnostic logging
//!
//! Logs go to stderr so they never mix with the report on stdout. `RUST_LOG`
//! takes precedence over the verbosity chosen on the command line.

use tracing_subscriber::{EnvFilter, fmt};

/// Map a `-v`/`-q` count to a default filter directive.
///
/// `0` is the default (`warn`), each `-v` raises the level by one step and a
/// negative value (from `-q`) silences everything but errors.
pub fn level_for_verbosity(verbosity: i8) -> &'static str {
    match verbosity {
        i8::MIN..=-1 => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global tracing subscriber.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init(verbosity: i8, use_color: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbosity)));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(use_color)
        .with_target(false)
        .try_init();
}
