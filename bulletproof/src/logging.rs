//! Diagnostic tracing for elm-bulletproof.
//!
//! Tracing goes to stderr and is controlled by `RUST_LOG`. Stdout is reserved
//! for the tool's own one-line messages, and the compiler writes its
//! diagnostics to the inherited stderr.

use std::io::IsTerminal;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG` env var. Defaults to `warn` if unset.
/// Output: stderr, compact format, colours only when stderr is a terminal.
///
/// # Example
/// ```bash
/// RUST_LOG=elm_bulletproof=debug elm-bulletproof tests/Stories.elm
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .compact(),
        )
        .init();
}
