//! Progress display functionality for file transfers

use log::warn;
use std::io::Write;

use crate::transfer::progress::TransferProgress;

/// Redraw the progress line for a transfer
pub fn display_progress<W: Write>(out: &mut W, filename: &str, progress: &TransferProgress) {
    let line = match progress.percentage() {
        Some(percentage) => {
            // 50 characters = 100%
            let filled = ((percentage / 2.0) as usize).min(50);
            let bar = "#".repeat(filled) + &" ".repeat(50 - filled);
            format!(
                "\r{}: [{}] {:.1}% ({}) {}",
                filename,
                bar,
                percentage,
                format_bytes(progress.transferred_bytes()),
                format_speed(progress.speed_bps())
            )
        }
        None => format!(
            "\r{}: {} {}",
            filename,
            format_bytes(progress.transferred_bytes()),
            format_speed(progress.speed_bps())
        ),
    };

    if let Err(e) = write!(out, "{}", line).and_then(|_| out.flush()) {
        warn!("Could not draw progress for {}: {}", filename, e);
    }
}

/// Move to the next line after the progress bar
pub fn finish_progress<W: Write>(out: &mut W) {
    if let Err(e) = writeln!(out) {
        warn!("Could not finish progress line: {}", e);
    }
}

/// Format bytes as human readable string
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Format speed as human readable string
pub fn format_speed(bps: f64) -> String {
    format!("{}/s", format_bytes(bps as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1024), "1.0 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1048576), "1.0 MB");
        assert_eq!(format_bytes(1073741824), "1.0 GB");
    }

    #[test]
    fn test_progress_line_with_known_size() {
        let mut progress = TransferProgress::new(Some(2048));
        progress.add_bytes(1024);

        let mut out = Vec::new();
        display_progress(&mut out, "a.bin", &progress);
        finish_progress(&mut out);

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\ra.bin: ["));
        assert!(text.contains("50.0% (1.0 KB)"));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_progress_line_with_unknown_size() {
        let mut progress = TransferProgress::new(None);
        progress.add_bytes(512);

        let mut out = Vec::new();
        display_progress(&mut out, "b.bin", &progress);

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\rb.bin: 512 B "));
        assert!(!text.contains('%'));
    }

    #[test]
    fn test_format_speed() {
        assert_eq!(format_speed(0.0), "0 B/s");
        assert_eq!(format_speed(1024.0), "1.0 KB/s");
        assert_eq!(format_speed(1048576.0), "1.0 MB/s");
    }
}
