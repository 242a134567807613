use crate::{
    app_state::AppState,
    handlers,
    storage::{InMemoryStorage, StorageBackend},
};
use axum::{
    Router,
    routing::{get, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Create the application router with all routes and middleware
///
/// This function is used by both main.rs and integration tests to ensure
/// the same server configuration is used in both production and tests.
/// `local_store` mounts the direct-upload route of the in-memory store;
/// with a real object store uploads never reach this server.
pub fn create_app(app_state: AppState, local_store: Option<InMemoryStorage>) -> Router {
    use handlers::{list_objects, not_found, put_object, upload_url};

    let mut app = Router::new()
        .route("/api/objects", get(list_objects))
        .route("/api/upload", get(upload_url))
        .with_state(app_state);

    if let Some(store) = local_store {
        let object_path = format!("/{}/{{*key}}", store.bucket());
        tracing::info!("Serving in-memory store uploads under /{}/", store.bucket());

        app = app.merge(
            Router::new()
                .route(&object_path, put(put_object))
                .with_state(store),
        );
    }

    app.fallback(not_found)
        // Browser clients call the API and the store from another origin
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
