pub mod error;
mod models;

pub use models::{ApiResponse, ObjectSummary, UploadAuthorization};
