use super::backend::StorageBackend;
use super::signing::UploadSigner;
use crate::types::{ObjectSummary, UploadAuthorization, error::StoreError};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Characters escaped in the key part of an upload URL. `/` stays literal
/// so nested keys map onto path segments.
const KEY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// In-memory object store for local development and tests.
///
/// Mints its own signed upload URLs pointing at `public_url`; the PUT side
/// is served by [`crate::handlers::put_object`].
#[derive(Clone)]
pub struct InMemoryStorage {
    objects: Arc<RwLock<HashMap<String, StoredObject>>>,
    bucket: String,
    public_url: String,
    signer: UploadSigner,
}

/// Object body plus the attributes recorded at upload time
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub data: Bytes,
    pub content_type: String,
    pub last_modified: DateTime<Utc>,
}

impl InMemoryStorage {
    pub fn new(bucket: impl Into<String>, public_url: impl Into<String>) -> Self {
        Self::with_signer(bucket, public_url, UploadSigner::ephemeral())
    }

    pub fn with_signer(
        bucket: impl Into<String>,
        public_url: impl Into<String>,
        signer: UploadSigner,
    ) -> Self {
        Self {
            objects: Arc::new(RwLock::new(HashMap::new())),
            bucket: bucket.into(),
            public_url: public_url.into().trim_end_matches('/').to_string(),
            signer,
        }
    }

    fn object_path(&self, key: &str) -> String {
        format!("/{}/{}", self.bucket, key)
    }

    fn calculate_etag(data: &[u8]) -> String {
        use sha2::{Digest, Sha256};
        let hash = Sha256::digest(data);
        format!("\"{}\"", hex::encode(hash))
    }

    /// Check that `params` authorize a PUT of `key` at time `now`
    pub fn verify_upload(
        &self,
        key: &str,
        params: &HashMap<String, String>,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.signer.verify(&self.object_path(key), params, now)
    }

    pub async fn put_object(
        &self,
        key: &str,
        data: Bytes,
        content_type: Option<&str>,
    ) -> Result<String, StoreError> {
        if key.is_empty() {
            return Err(StoreError::InvalidRequest("Object key is empty".to_string()));
        }

        let etag = Self::calculate_etag(&data);

        let object = StoredObject {
            data,
            content_type: content_type.unwrap_or("binary/octet-stream").to_string(),
            last_modified: Utc::now(),
        };

        let mut objects = self.objects.write().await;
        objects.insert(key.to_string(), object);

        Ok(etag)
    }

    pub async fn get_object(&self, key: &str) -> Result<StoredObject, StoreError> {
        let objects = self.objects.read().await;

        objects.get(key).cloned().ok_or(StoreError::NoSuchKey)
    }
}

#[async_trait::async_trait]
impl StorageBackend for InMemoryStorage {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn list_objects(
        &self,
        prefix: Option<&str>,
        delimiter: Option<&str>,
    ) -> Result<Vec<ObjectSummary>, StoreError> {
        let objects = self.objects.read().await;
        let prefix = prefix.unwrap_or("");

        let mut results: Vec<ObjectSummary> = objects
            .iter()
            .filter_map(|(key, obj)| {
                let rest = key.strip_prefix(prefix)?;
                if let Some(delimiter) = delimiter
                    && !delimiter.is_empty()
                    && rest.contains(delimiter)
                {
                    return None;
                }

                Some(ObjectSummary {
                    key: key.clone(),
                    last_modified: obj.last_modified,
                    size: obj.data.len() as u64,
                })
            })
            .collect();

        results.sort_by(|a, b| a.key.cmp(&b.key));

        Ok(results)
    }

    async fn presign_put(
        &self,
        key: &str,
        expires_in: Duration,
    ) -> Result<UploadAuthorization, StoreError> {
        let query = self
            .signer
            .sign(&self.object_path(key), Utc::now(), expires_in)?;

        let url = format!(
            "{}/{}/{}?{}",
            self.public_url,
            self.bucket,
            utf8_percent_encode(key, KEY_ENCODE_SET),
            query.to_query_string()
        );

        Ok(UploadAuthorization { url, expires_in })
    }
}
