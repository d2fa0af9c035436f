//! Storybook-style runner harness for Elm projects.
//!
//! Given one stories file, this crate locates the enclosing Elm project,
//! merges its `elm.json` with the bundled runner application's manifest,
//! writes a generated runner project under
//! `elm-stuff/elm-bulletproof/<version>/` and optionally compiles it with
//! `elm make`. The architecture keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (location splitting, manifest merge).
//!   No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (project discovery, file generation,
//!   compiler process). Isolated behind plain functions and the
//!   [`io::compiler::Compiler`] trait.
//!
//! [`bundle`] coordinates the two to implement the CLI.

pub mod bundle;
pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod version;
