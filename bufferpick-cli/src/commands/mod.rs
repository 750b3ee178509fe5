//! CLI command implementations.

pub mod buffer;
pub mod config;
pub mod simulate;
