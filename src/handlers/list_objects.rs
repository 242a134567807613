use super::query::first_param;
use crate::{
    app_state::AppState,
    types::{ApiResponse, ObjectSummary, error::ApiError},
};
use axum::{
    Json,
    extract::{Query, State},
};

/// Listings are one level deep: nested keys are grouped on this delimiter
const DELIMITER: &str = "/";

/// GET /api/objects - List objects at the bucket root
pub async fn list_objects(
    Query(params): Query<Vec<(String, String)>>,
    State(app_state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ObjectSummary>>>, ApiError> {
    let requested = first_param(&params, &["Prefix", "prefix"]);

    let storage = &app_state.storage;
    tracing::info!(
        "LIST objects: bucket={}, prefix={:?}",
        storage.bucket(),
        requested
    );

    let prefix = if app_state.forward_prefix {
        requested
    } else {
        None
    };

    let summaries = storage.list_objects(prefix, Some(DELIMITER)).await?;

    tracing::debug!("Listed {} objects", summaries.len());
    Ok(Json(ApiResponse::ok("success", summaries)))
}
