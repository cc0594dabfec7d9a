//! File download functionality

use log::{debug, error, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::connection::DataConnection;
use crate::error::{FtpsError, Result};
use crate::terminal::progress::{display_progress, finish_progress, format_bytes};
use crate::transfer::progress::TransferProgress;

/// Bytes between progress redraws
const PROGRESS_INTERVAL: u64 = 64 * 1024;

/// Download a file through the data connection with progress tracking
pub fn download_file_with_progress<W: Write>(
    data_connection: &mut DataConnection,
    local_path: &Path,
    filename: &str,
    out: &mut W,
) -> Result<u64> {
    info!("Starting download of '{filename}' to {}", local_path.display());

    let file = File::create(local_path).map_err(|e| FtpsError::TransferFailed {
        code: 550,
        message: format!("Cannot create local file '{}': {}", local_path.display(), e),
    })?;

    let mut writer = BufWriter::new(file);
    let mut buffer = [0u8; 8192];
    let mut progress = TransferProgress::new(None);
    let mut next_redraw = PROGRESS_INTERVAL;

    loop {
        let bytes_received = data_connection.receive_data(&mut buffer)?;
        if bytes_received == 0 {
            debug!("Reached end of file, {} bytes received", progress.transferred_bytes());
            break;
        }

        writer.write_all(&buffer[..bytes_received]).map_err(|e| {
            error!("Failed to write to local file: {e}");
            FtpsError::TransferFailed {
                code: 550,
                message: format!("Failed to write to file: {e}"),
            }
        })?;
        progress.add_bytes(bytes_received as u64);

        if progress.transferred_bytes() >= next_redraw {
            display_progress(out, filename, &progress);
            next_redraw += PROGRESS_INTERVAL;
        }
    }

    writer.flush().map_err(|e| FtpsError::TransferFailed {
        code: 550,
        message: format!("Failed to flush file: {e}"),
    })?;

    display_progress(out, filename, &progress);
    finish_progress(out);

    info!(
        "Download completed: {} bytes in {:?}",
        progress.transferred_bytes(),
        progress.elapsed()
    );
    writeln!(
        out,
        "Download completed: {} ({})",
        filename,
        format_bytes(progress.transferred_bytes())
    )?;
    Ok(progress.transferred_bytes())
}

/// Validate that the download target directory exists
pub fn validate_download_path(local_path: &Path) -> Result<()> {
    if let Some(parent) = local_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            return Err(FtpsError::TransferFailed {
                code: 550,
                message: format!("Directory '{}' does not exist", parent.display()),
            });
        }
    }

    if local_path.is_dir() {
        return Err(FtpsError::TransferFailed {
            code: 550,
            message: format!("'{}' is a directory", local_path.display()),
        });
    }

    Ok(())
}
