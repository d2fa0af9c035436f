//! Tool version, used to namespace generated output.

/// The elm-bulletproof version string (for example, `0.1.0`).
pub const BULLETPROOF_VERSION: &str = env!("CARGO_PKG_VERSION");
