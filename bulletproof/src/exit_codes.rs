//! Stable exit codes for the elm-bulletproof CLI.

/// Stories were generated (and compiled, unless generate-only).
pub const OK: i32 = 0;
/// Usage, configuration or compilation failure.
pub const FAILURE: i32 = 1;
