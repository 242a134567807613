use crate::config::S3BackendConfig;
use crate::storage::backend::StorageBackend;
use crate::types::{ObjectSummary, UploadAuthorization, error::StoreError};
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use std::time::Duration;

pub struct S3Backend {
    client: S3Client,
    bucket: String,
}

impl S3Backend {
    pub async fn new(config: &S3BackendConfig) -> Self {
        let mut config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()));

        // Static credentials win over the default provider chain
        if let (Some(key_id), Some(secret_key)) = (&config.access_key_id, &config.secret_access_key)
        {
            config_loader = config_loader.credentials_provider(
                aws_sdk_s3::config::Credentials::new(
                    key_id.clone(),
                    secret_key.clone(),
                    None,
                    None,
                    "static",
                ),
            );
        }

        let sdk_config = config_loader.load().await;

        let mut s3_config_builder = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.force_path_style);

        if let Some(endpoint_url) = &config.endpoint {
            s3_config_builder = s3_config_builder.endpoint_url(endpoint_url);
        }

        Self::from_client(S3Client::from_conf(s3_config_builder.build()), config.bucket.clone())
    }

    pub fn from_client(client: S3Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    /// Entries without a key or a usable timestamp are skipped
    fn to_summary(obj: &aws_sdk_s3::types::Object) -> Option<ObjectSummary> {
        let key = obj.key()?;
        let Some(last_modified) = obj
            .last_modified()
            .and_then(|dt| chrono::DateTime::from_timestamp(dt.secs(), dt.subsec_nanos()))
        else {
            tracing::warn!("Skipping listed object without LastModified: {}", key);
            return None;
        };

        Some(ObjectSummary {
            key: key.to_string(),
            last_modified,
            size: obj.size().unwrap_or(0).max(0) as u64,
        })
    }
}

#[async_trait::async_trait]
impl StorageBackend for S3Backend {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn list_objects(
        &self,
        prefix: Option<&str>,
        delimiter: Option<&str>,
    ) -> Result<Vec<ObjectSummary>, StoreError> {
        tracing::debug!(
            "[{}] Listing objects with prefix: {:?}, delimiter: {:?}",
            self.bucket,
            prefix,
            delimiter
        );

        let mut request = self.client.list_objects_v2().bucket(&self.bucket);

        if let Some(p) = prefix {
            request = request.prefix(p);
        }
        if let Some(d) = delimiter {
            request = request.delimiter(d);
        }

        match request.send().await {
            Ok(output) => {
                let objects: Vec<ObjectSummary> =
                    output.contents().iter().filter_map(Self::to_summary).collect();

                tracing::debug!("[{}] Found {} objects", self.bucket, objects.len());
                Ok(objects)
            }
            Err(err) => {
                let err = DisplayErrorContext(&err);
                tracing::error!("[{}] Failed to list objects: {}", self.bucket, err);
                Err(StoreError::InternalError(format!(
                    "Failed to list objects in {}: {}",
                    self.bucket, err
                )))
            }
        }
    }

    async fn presign_put(
        &self,
        key: &str,
        expires_in: Duration,
    ) -> Result<UploadAuthorization, StoreError> {
        tracing::debug!("[{}] Presigning PUT for object: {}", self.bucket, key);

        let presigning = PresigningConfig::expires_in(expires_in).map_err(|e| {
            StoreError::InternalError(format!("Invalid presigning configuration: {}", e))
        })?;

        let presigned = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|err| {
                let err = DisplayErrorContext(&err);
                tracing::error!("[{}] Failed to presign {}: {}", self.bucket, key, err);
                StoreError::InternalError(format!("Failed to presign upload for {}: {}", key, err))
            })?;

        Ok(UploadAuthorization {
            url: presigned.uri().to_string(),
            expires_in,
        })
    }
}
