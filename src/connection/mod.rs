//! Connection management for the ftps client
//!
//! The session core talks to the server only through the [`Connector`] and
//! [`FtpTransport`] traits; the control and data channel types below back the
//! shipped implementation in `client`.

pub mod command;
pub mod data;

// Re-export main types
pub use command::CommandConnection;
pub use data::DataConnection;

use crate::error::Result;

/// Remote file operations on a logged-in FTP session
pub trait FtpTransport {
    /// Working directory as reported by the server
    fn pwd(&mut self) -> Result<String>;

    fn chdir(&mut self, path: &str) -> Result<()>;

    /// Listing lines matching `pattern`; an empty pattern lists the current directory
    fn list(&mut self, pattern: &str) -> Result<Vec<String>>;

    /// Download a remote file into the local directory
    fn get(&mut self, name: &str) -> Result<()>;

    /// Upload a local file under its base name
    fn put(&mut self, name: &str) -> Result<()>;

    /// Graceful logout
    fn quit(&mut self) -> Result<()>;
}

/// Establishes logged-in sessions
pub trait Connector {
    type Transport: FtpTransport;

    fn connect(&self, host: &str, user: &str, password: &str) -> Result<Self::Transport>;
}
