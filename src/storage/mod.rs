mod backend;
mod in_memory;
mod s3;
pub mod signing;

pub use backend::StorageBackend;
pub use in_memory::{InMemoryStorage, StoredObject};
pub use s3::S3Backend;
