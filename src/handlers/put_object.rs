use crate::{storage::InMemoryStorage, types::error::StoreError};
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::BytesMut;
use futures::stream::StreamExt;
use std::collections::HashMap;

/// PUT /{bucket}/{key}?X-Amz-... - Direct upload to the in-memory store
/// through a presigned URL
pub async fn put_object(
    Path(key): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    State(storage): State<InMemoryStorage>,
    headers: HeaderMap,
    body: Body,
) -> Result<Response, StoreError> {
    tracing::info!("PUT object: key={}", key);

    if let Err(e) = storage.verify_upload(&key, &params, chrono::Utc::now()) {
        tracing::warn!("Rejected upload for {}: {}", key, e);
        return Err(e);
    }

    let mut data = BytesMut::new();
    let mut stream = body.into_data_stream();
    while let Some(chunk) = stream.next().await {
        let chunk =
            chunk.map_err(|e| StoreError::InternalError(format!("Failed to read body: {}", e)))?;
        data.extend_from_slice(&chunk);
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    let etag = storage.put_object(&key, data.freeze(), content_type).await?;

    Ok((StatusCode::OK, [("etag", etag)]).into_response())
}
