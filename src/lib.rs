// Library exports for the binary and integration tests
pub mod app_state;
pub mod client;
pub mod config;
pub mod handlers;
pub mod server;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use app_state::AppState;
pub use config::{BackendConfig, Config};
pub use storage::{InMemoryStorage, S3Backend, StorageBackend};
pub use types::{ApiResponse, ObjectSummary};

// Re-export server creation function
pub use server::create_app;
