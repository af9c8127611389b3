//! Tracing subscriber setup for the CLI.
//!
//! Logs go to stderr so stdout carries only the debate document (or JSON).

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

/// Install the global fmt subscriber. `RUST_LOG` takes precedence.
pub fn init(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive(verbose).into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
