//! Transfer progress tracking

use std::time::{Duration, Instant};

/// Progress tracker for file transfers
pub struct TransferProgress {
    /// Expected size, when known up front
    total_bytes: Option<u64>,
    transferred_bytes: u64,
    start_time: Instant,
}

impl TransferProgress {
    /// Create a new progress tracker
    pub fn new(total_bytes: Option<u64>) -> Self {
        Self {
            total_bytes,
            transferred_bytes: 0,
            start_time: Instant::now(),
        }
    }

    /// Add bytes to current progress
    pub fn add_bytes(&mut self, bytes: u64) {
        self.transferred_bytes += bytes;
    }

    pub fn transferred_bytes(&self) -> u64 {
        self.transferred_bytes
    }

    /// Get current progress percentage, if the total is known
    pub fn percentage(&self) -> Option<f64> {
        match self.total_bytes {
            Some(0) => Some(100.0),
            Some(total) => Some((self.transferred_bytes as f64 / total as f64 * 100.0).min(100.0)),
            None => None,
        }
    }

    /// Get transfer speed in bytes per second
    pub fn speed_bps(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.transferred_bytes as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Get elapsed time
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}
