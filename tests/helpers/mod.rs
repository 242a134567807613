#![allow(dead_code)]

mod test_server;

pub use test_server::TestServer;

use axum::{Router, body::Body, http::Request};
use filemanager::{
    AppState, StorageBackend, create_app,
    types::{ObjectSummary, UploadAuthorization, error::StoreError},
};
use http_body_util::BodyExt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tower::ServiceExt;

pub const TEST_BUCKET: &str = "test-bucket";

/// Backend that counts calls and can be told to fail every request
#[derive(Default)]
pub struct RecordingBackend {
    failure: Option<String>,
    list_calls: AtomicUsize,
    presign_calls: AtomicUsize,
}

impl RecordingBackend {
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn presign_calls(&self) -> usize {
        self.presign_calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), StoreError> {
        match &self.failure {
            Some(message) => Err(StoreError::InternalError(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl StorageBackend for RecordingBackend {
    fn bucket(&self) -> &str {
        TEST_BUCKET
    }

    async fn list_objects(
        &self,
        _prefix: Option<&str>,
        _delimiter: Option<&str>,
    ) -> Result<Vec<ObjectSummary>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(Vec::new())
    }

    async fn presign_put(
        &self,
        key: &str,
        expires_in: Duration,
    ) -> Result<UploadAuthorization, StoreError> {
        self.presign_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(UploadAuthorization {
            url: format!("https://store.invalid/{}/{}", TEST_BUCKET, key),
            expires_in,
        })
    }
}

pub fn recording_app(backend: Arc<RecordingBackend>) -> Router {
    let app_state = AppState::new(backend, Duration::from_secs(36_000));
    create_app(app_state, None)
}

/// Send a GET through the router without a network listener
pub async fn oneshot_get(app: Router, uri: &str) -> (u16, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status().as_u16();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}
