use super::query::first_param;
use crate::{
    app_state::AppState,
    types::{ApiResponse, error::ApiError},
};
use axum::{
    Json,
    extract::{Query, State},
};

/// GET /api/upload?key=<key> - Presign a single PUT for `key`
pub async fn upload_url(
    Query(params): Query<Vec<(String, String)>>,
    State(app_state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    let key = first_param(&params, &["key"])
        .ok_or_else(|| ApiError::Validation("Missing required query parameter: key".to_string()))?;

    let storage = &app_state.storage;
    tracing::info!("PRESIGN upload: bucket={}, key={}", storage.bucket(), key);

    let authorization = storage.presign_put(key, app_state.upload_expiry).await?;
    tracing::debug!(
        "Presigned {} valid for {}s",
        key,
        authorization.expires_in.as_secs()
    );

    Ok(Json(ApiResponse::ok("presigned URL", authorization.url)))
}
