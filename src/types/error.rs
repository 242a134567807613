use crate::types::ApiResponse;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use quick_xml::se::to_string as to_xml_string;
use serde::Serialize;
use thiserror::Error;

/// Object store errors, rendered S3-style on the store surface
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("The specified key does not exist.")]
    NoSuchKey,
    #[error("{0}")]
    InvalidRequest(String),
    #[error("{0}")]
    AccessDenied(String),
    #[error("The request signature we calculated does not match the signature you provided.")]
    SignatureDoesNotMatch,
    #[error("Internal Error: {0}")]
    InternalError(String),
}

/// S3 XML error response format
#[derive(Serialize)]
#[serde(rename = "Error")]
struct StoreErrorResponse {
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "Message")]
    message: String,
    #[serde(rename = "RequestId")]
    request_id: String,
}

impl StoreError {
    fn status_code(&self) -> StatusCode {
        match self {
            StoreError::NoSuchKey => StatusCode::NOT_FOUND,
            StoreError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            StoreError::AccessDenied(_) => StatusCode::FORBIDDEN,
            StoreError::SignatureDoesNotMatch => StatusCode::FORBIDDEN,
            StoreError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            StoreError::NoSuchKey => "NoSuchKey",
            StoreError::InvalidRequest(_) => "InvalidRequest",
            StoreError::AccessDenied(_) => "AccessDenied",
            StoreError::SignatureDoesNotMatch => "SignatureDoesNotMatch",
            StoreError::InternalError(_) => "InternalError",
        }
    }
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let error_response = StoreErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            request_id: uuid::Uuid::new_v4().to_string(),
        };

        let body = to_xml_string(&error_response).unwrap_or_else(|_| {
            r#"<?xml version="1.0" encoding="UTF-8"?>
<Error>
    <Code>InternalError</Code>
    <Message>Failed to serialize error response</Message>
</Error>"#
                .to_string()
        });

        (
            self.status_code(),
            [("content-type", "application/xml")],
            body,
        )
            .into_response()
    }
}

/// Errors returned by the `/api` endpoints
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed client input
    #[error("{0}")]
    Validation(String),
    /// The object store call failed; the message is passed through
    #[error("{0}")]
    Upstream(String),
    #[error("not found")]
    NotFound,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let body: ApiResponse<()> = ApiResponse {
            status: status.as_u16(),
            message: self.to_string(),
            data: None,
        };

        (status, Json(body)).into_response()
    }
}
