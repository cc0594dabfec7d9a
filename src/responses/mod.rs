//! FTP response parsing module

pub mod parser;
pub mod status_codes;

// Re-export main types
pub use parser::{FtpResponse, parse_pasv_address, parse_quoted_path, parse_response};
pub use status_codes::*;
