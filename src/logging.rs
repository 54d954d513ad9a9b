//! Logging setup
//!
//! Diagnostics go to stderr through `tracing`; stdout carries only the report or dump.

use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

/// Map the number of `-v` flags onto a level for this crate.
pub fn level_for_verbosity(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    }
}

/// Install the global subscriber. `RUST_LOG`, when set, takes precedence.
///
/// Calling this more than once keeps the first subscriber.
pub fn init_logging(verbosity: u8) {
    let level = level_for_verbosity(verbosity);
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rust_schemacompare={level}")));

    let _ = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
