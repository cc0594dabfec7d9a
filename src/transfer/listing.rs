//! Directory listing functionality for FTP transfers

use log::{debug, info};

use crate::connection::DataConnection;
use crate::error::{FtpsError, Result};

/// Read directory listing from data connection
pub fn read_directory_listing(data_connection: &mut DataConnection) -> Result<Vec<String>> {
    let mut raw = Vec::new();
    let mut buffer = [0u8; 8192];

    // Read data until the server closes the connection
    loop {
        let bytes_read = data_connection.receive_data(&mut buffer).map_err(|e| {
            FtpsError::TransferFailed {
                code: 426,
                message: format!("Failed to read directory listing: {}", e),
            }
        })?;
        if bytes_read == 0 {
            debug!("Data connection closed by server");
            break;
        }
        raw.extend_from_slice(&buffer[..bytes_read]);
    }

    let listing = split_listing(&String::from_utf8_lossy(&raw));
    info!("Read {} directory entries", listing.len());
    Ok(listing)
}

/// Split raw listing text into non-blank lines
pub fn split_listing(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// File name of a listing line: its last whitespace-delimited token
pub fn entry_name(line: &str) -> Option<&str> {
    line.split_whitespace().last()
}
