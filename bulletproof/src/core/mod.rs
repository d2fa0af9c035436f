//! Deterministic, pure logic shared by the bulletproof pipeline.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod location;
pub mod manifest;
