//! Upload client: the orchestrator that talks to the backend and pushes
//! file bytes directly to the object store.

mod api;
mod error;
mod file;
mod uploader;

pub use api::ApiClient;
pub use error::UploadError;
pub use file::{DEFAULT_CONTENT_TYPE, SelectedFile, format_file_size};
pub use uploader::{UploadAttempt, UploadState, Uploader};
