//! Terminal module for the ftps client
//!
//! This module handles the interactive loop and transfer progress display.

pub mod progress;
pub mod repl;

// Re-export commonly used items
pub use repl::Repl;
