use super::{SelectedFile, UploadError};
use crate::types::{ApiResponse, ObjectSummary};
use reqwest::{StatusCode, header};
use serde::de::DeserializeOwned;

/// HTTP client for the `/api` endpoints and for direct transfers to the
/// object store
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Ask the backend for a presigned upload URL for `key`
    pub async fn upload_url(&self, key: &str) -> Result<String, UploadError> {
        let response = self
            .http
            .get(format!("{}/api/upload", self.base_url))
            .query(&[("key", key)])
            .send()
            .await
            .map_err(|e| UploadError::Authorization(e.to_string()))?;

        let envelope: ApiResponse<String> = read_envelope(response)
            .await
            .map_err(UploadError::Authorization)?;

        if !envelope.is_success() {
            let message = if envelope.message.is_empty() {
                "Failed to get presigned URL".to_string()
            } else {
                envelope.message
            };
            return Err(UploadError::Authorization(message));
        }

        envelope
            .data
            .ok_or_else(|| UploadError::Authorization("Response carried no URL".to_string()))
    }

    /// PUT the file's bytes to a presigned URL and report the store's status.
    /// Only transport failures are errors here.
    pub async fn put_file(
        &self,
        url: &str,
        file: &SelectedFile,
    ) -> Result<StatusCode, UploadError> {
        let response = self
            .http
            .put(url)
            .header(header::CONTENT_TYPE, file.content_type())
            .body(file.data.clone())
            .send()
            .await
            .map_err(|e| UploadError::Transfer(e.to_string()))?;

        Ok(response.status())
    }

    pub async fn list_objects(&self) -> Result<Vec<ObjectSummary>, UploadError> {
        let response = self
            .http
            .get(format!("{}/api/objects", self.base_url))
            .send()
            .await
            .map_err(|e| UploadError::Listing(e.to_string()))?;

        let envelope: ApiResponse<Vec<ObjectSummary>> = read_envelope(response)
            .await
            .map_err(UploadError::Listing)?;

        if !envelope.is_success() {
            return Err(UploadError::Listing(envelope.message));
        }

        Ok(envelope.data.unwrap_or_default())
    }
}

/// Decode the JSON envelope; the body status is authoritative, the
/// transport status is only reported when the body can't be read.
async fn read_envelope<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<ApiResponse<T>, String> {
    let status = response.status();
    let body = response.bytes().await.map_err(|e| e.to_string())?;

    match serde_json::from_slice::<ApiResponse<T>>(&body) {
        Ok(envelope) => Ok(envelope),
        Err(_) if !status.is_success() => Err(format!(
            "HTTP {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown")
        )),
        Err(e) => Err(format!("Invalid response body: {}", e)),
    }
}
