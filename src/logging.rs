//! Tracing subscriber setup
//!
//! Logs go to stderr so report output on stdout stays machine-readable.
//! `RUST_LOG` takes precedence over the verbosity flag.

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

/// Map a `-v` count to a filter directive for this crate
pub fn directive_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "expense_tracker=warn",
        1 => "expense_tracker=info",
        _ => "expense_tracker=debug",
    }
}

/// Initializes the global tracing subscriber once per process
pub fn init_tracing(verbosity: u8) {
    TRACING_INIT.call_once(|| {
        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::new(directive_for(verbosity)),
        };

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    });
}
