use crate::types::{ObjectSummary, UploadAuthorization, error::StoreError};
use std::time::Duration;

/// Object store seam used by the request handlers.
///
/// Implementations are created once at startup and shared read-only
/// across requests.
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync {
    /// Bucket every operation is scoped to
    fn bucket(&self) -> &str;

    /// List objects directly under `prefix`.
    ///
    /// With a delimiter, keys that contain it after the prefix are grouped
    /// away and not returned.
    async fn list_objects(
        &self,
        prefix: Option<&str>,
        delimiter: Option<&str>,
    ) -> Result<Vec<ObjectSummary>, StoreError>;

    /// Mint a URL that authorizes a single PUT of `key` until `expires_in`
    /// has elapsed.
    async fn presign_put(
        &self,
        key: &str,
        expires_in: Duration,
    ) -> Result<UploadAuthorization, StoreError>;
}
