//! I/O helpers for the bulletproof pipeline.

pub mod codegen;
pub mod compiler;
pub mod config;
pub mod project;
pub mod template;
