use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of a single upload attempt. None of them are retried.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Please select a file first")]
    NoFileSelected,

    #[error("Failed to read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Error getting presigned URL: {0}")]
    Authorization(String),

    #[error("Error uploading file: {0}")]
    Transfer(String),

    #[error("Upload failed - received non-success response ({0})")]
    Rejected(StatusCode),

    #[error("Error fetching objects: {0}")]
    Listing(String),
}
