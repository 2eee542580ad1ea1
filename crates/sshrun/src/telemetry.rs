//! Logging setup
//!
//! Logs go to stderr; stdout carries only the remote command's output.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Effective log level for a configured level and `-v` count
pub fn effective_level(configured: &str, verbose: u8) -> &str {
    match verbose {
        0 => configured,
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber; `RUST_LOG` takes precedence
pub fn init(configured: &str, verbose: u8) {
    let level = effective_level(configured, verbose);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), level = %level, "logging initialized");
}
