use crate::storage::StorageBackend;
use std::sync::Arc;
use std::time::Duration;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn StorageBackend>,
    pub upload_expiry: Duration,
    pub forward_prefix: bool,
}

impl AppState {
    pub fn new(storage: Arc<dyn StorageBackend>, upload_expiry: Duration) -> Self {
        Self {
            storage,
            upload_expiry,
            forward_prefix: false,
        }
    }

    pub fn with_forward_prefix(mut self, forward_prefix: bool) -> Self {
        self.forward_prefix = forward_prefix;
        self
    }
}
