use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Flattened listing entry returned by `GET /api/objects`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSummary {
    pub key: String,
    pub last_modified: DateTime<Utc>,
    pub size: u64,
}

impl ObjectSummary {
    /// Keys ending with the delimiter are folder placeholders
    pub fn is_folder(&self) -> bool {
        self.key.ends_with('/')
    }
}

/// A signed, time-boxed URL allowing one PUT of a single key
#[derive(Debug, Clone)]
pub struct UploadAuthorization {
    pub url: String,
    pub expires_in: Duration,
}

/// JSON envelope shared by every `/api` response.
///
/// `status` carries the outcome; the HTTP status code of the response
/// mirrors it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            status: 200,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}
