//! File transfer module for the ftps client

pub mod download;
pub mod listing;
pub mod progress;
pub mod upload;

// Re-export main functions
pub use download::{download_file_with_progress, validate_download_path};
pub use listing::{entry_name, read_directory_listing};
pub use upload::{upload_file_with_progress, validate_upload_file};
