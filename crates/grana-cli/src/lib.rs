//! Shared utilities for grana-cli
//!
//! Parsing helpers and path handling reused across the CLI commands.

pub mod parsers;

// Re-export commonly used items at the crate root for convenience
pub use parsers::{determine_output_path, parse_color};
