use filemanager::{AppState, InMemoryStorage, StorageBackend, client::ApiClient, create_app};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Test server handle that automatically shuts down on drop
///
/// This starts a real HTTP server on a random port for integration testing.
/// The server uses the actual production code via create_app() with the
/// in-memory store mounted, so presigned URLs point back at it.
pub struct TestServer {
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    #[allow(dead_code)] // Keep handle alive to prevent task abort
    handle: JoinHandle<()>,
    pub base_url: String,
    pub storage: InMemoryStorage,
    pub http: reqwest::Client,
}

#[allow(dead_code)]
impl TestServer {
    /// Start a test server with default upload expiry and no prefix forwarding
    pub async fn start(bucket_name: &str) -> Self {
        Self::start_with(bucket_name, Duration::from_secs(36_000), false).await
    }

    pub async fn start_with(
        bucket_name: &str,
        upload_expiry: Duration,
        forward_prefix: bool,
    ) -> Self {
        // Bind first so the store knows the URL it signs for
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let storage = InMemoryStorage::new(bucket_name, base_url.clone());
        let backend: Arc<dyn StorageBackend> = Arc::new(storage.clone());

        let app_state = AppState::new(backend, upload_expiry).with_forward_prefix(forward_prefix);

        // Use the ACTUAL production create_app function
        let app = create_app(app_state, Some(storage.clone()));

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        // Spawn server task
        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        TestServer {
            shutdown_tx: Some(shutdown_tx),
            handle,
            base_url,
            storage,
            http: reqwest::Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn api(&self) -> ApiClient {
        ApiClient::new(self.base_url.clone())
    }

    /// GET an `/api` path and return the transport status and JSON body
    pub async fn get_json(&self, path: &str) -> (u16, serde_json::Value) {
        let response = self.http.get(self.url(path)).send().await.unwrap();
        let status = response.status().as_u16();
        let body = response.json().await.unwrap();
        (status, body)
    }

    /// Ask the backend for an upload URL for `key`
    pub async fn presigned_url(&self, key: &str) -> String {
        self.api().upload_url(key).await.unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Signal shutdown (ignore errors if already shut down)
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
