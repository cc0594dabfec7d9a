//! Interactive commands module
//!
//! This module defines the command whitelist and line parsing.

pub mod command;
pub mod help;
pub mod parser;

// Re-export the main types for easier importing
pub use command::Command;
pub use help::{get_help_text, get_usage_hint};
pub use parser::parse_command;
