//! File upload functionality

use log::{debug, error, info};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use crate::connection::DataConnection;
use crate::error::{FtpsError, Result};
use crate::terminal::progress::{display_progress, finish_progress, format_bytes};
use crate::transfer::progress::TransferProgress;

/// Bytes between progress redraws
const PROGRESS_INTERVAL: u64 = 64 * 1024;

/// Upload a file through the data connection with progress tracking
pub fn upload_file_with_progress<W: Write>(
    data_connection: &mut DataConnection,
    local_path: &Path,
    filename: &str,
    out: &mut W,
) -> Result<u64> {
    let file = File::open(local_path).map_err(|e| FtpsError::FileNotFound {
        code: 550,
        message: format!("Cannot open local file '{}': {}", local_path.display(), e),
    })?;

    let file_size = file.metadata()?.len();
    info!("Starting upload of '{filename}' ({file_size} bytes)");

    let mut progress = TransferProgress::new(Some(file_size));
    let mut reader = BufReader::new(file);
    let mut buffer = [0u8; 8192];
    let mut next_redraw = PROGRESS_INTERVAL;

    loop {
        let bytes_read = reader.read(&mut buffer).map_err(|e| {
            error!("Failed to read from file: {e}");
            FtpsError::TransferFailed {
                code: 550,
                message: format!("Failed to read file: {e}"),
            }
        })?;
        if bytes_read == 0 {
            debug!("Reached end of file, {} bytes sent", progress.transferred_bytes());
            break;
        }

        let bytes_sent = data_connection.send_data(&buffer[..bytes_read])?;
        progress.add_bytes(bytes_sent as u64);

        if progress.transferred_bytes() >= next_redraw {
            display_progress(out, filename, &progress);
            next_redraw += PROGRESS_INTERVAL;
        }
    }

    // The server only sees end-of-file once the data channel closes
    data_connection.close()?;

    display_progress(out, filename, &progress);
    finish_progress(out);

    info!(
        "Upload completed: {} bytes in {:?}",
        progress.transferred_bytes(),
        progress.elapsed()
    );
    writeln!(
        out,
        "Upload completed: {} ({})",
        filename,
        format_bytes(progress.transferred_bytes())
    )?;
    Ok(progress.transferred_bytes())
}

/// Validate that a file can be uploaded
pub fn validate_upload_file(local_path: &Path) -> Result<()> {
    if !local_path.exists() {
        return Err(FtpsError::FileNotFound {
            code: 550,
            message: format!("Local file '{}' does not exist", local_path.display()),
        });
    }

    if !local_path.is_file() {
        return Err(FtpsError::TransferFailed {
            code: 550,
            message: format!("'{}' is not a file", local_path.display()),
        });
    }

    File::open(local_path).map(|_| ()).map_err(|e| FtpsError::TransferFailed {
        code: 550,
        message: format!("Cannot read file '{}': {}", local_path.display(), e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs};

    #[test]
    fn test_validate_upload_file() {
        let dir = env::temp_dir();
        let path = dir.join(format!("ftps-upload-{}.txt", std::process::id()));
        fs::write(&path, b"data").unwrap();

        assert!(validate_upload_file(&path).is_ok());
        assert!(matches!(
            validate_upload_file(&dir.join("ftps-no-such-upload.txt")),
            Err(FtpsError::FileNotFound { .. })
        ));
        assert!(validate_upload_file(&dir).is_err());

        fs::remove_file(&path).unwrap();
    }
}
