use super::{ApiClient, SelectedFile, UploadError};
use crate::types::ObjectSummary;
use chrono::{DateTime, Utc};

pub const STATUS_AUTHORIZING: &str = "Getting presigned URL...";
pub const STATUS_UPLOADING: &str = "Uploading file...";
pub const STATUS_COMPLETED: &str = "Upload completed successfully!";

/// Lifecycle of one upload attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    AwaitingAuthorization,
    Uploading,
    Completed,
    Failed,
}

/// Record of a finished attempt, kept for display only
#[derive(Debug, Clone)]
pub struct UploadAttempt {
    pub file_name: String,
    pub file_size: u64,
    pub file_type: String,
    pub presigned_url: Option<String>,
    pub succeeded: bool,
    pub timestamp: DateTime<Utc>,
}

/// Drives the two-step upload: fetch a presigned URL from the backend,
/// then PUT the bytes straight to the object store. A completed upload
/// refreshes the object listing.
///
/// Only one attempt is tracked at a time.
pub struct Uploader {
    api: ApiClient,
    file: Option<SelectedFile>,
    state: UploadState,
    status: String,
    error: Option<String>,
    last_attempt: Option<UploadAttempt>,
    objects: Vec<ObjectSummary>,
}

impl Uploader {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            file: None,
            state: UploadState::Idle,
            status: String::new(),
            error: None,
            last_attempt: None,
            objects: Vec::new(),
        }
    }

    pub fn state(&self) -> UploadState {
        self.state
    }

    pub fn status_text(&self) -> &str {
        &self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn last_attempt(&self) -> Option<&UploadAttempt> {
        self.last_attempt.as_ref()
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    /// Objects from the most recent successful listing
    pub fn objects(&self) -> &[ObjectSummary] {
        &self.objects
    }

    /// Pick a file, discarding any previous status, result and error
    pub fn select_file(&mut self, file: SelectedFile) {
        self.file = Some(file);
        self.clear_progress();
    }

    /// Return to `Idle` and forget the selection
    pub fn reset(&mut self) {
        self.file = None;
        self.clear_progress();
    }

    fn clear_progress(&mut self) {
        self.transition(UploadState::Idle);
        self.status.clear();
        self.error = None;
        self.last_attempt = None;
    }

    fn transition(&mut self, next: UploadState) {
        if self.state != next {
            tracing::debug!("Upload state {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }

    /// Run one upload of the selected file. The file name is the object key.
    pub async fn upload(&mut self) -> Result<UploadAttempt, UploadError> {
        let Some(file) = self.file.clone() else {
            let err = UploadError::NoFileSelected;
            self.error = Some(err.to_string());
            return Err(err);
        };

        self.error = None;
        self.last_attempt = None;
        self.transition(UploadState::AwaitingAuthorization);
        self.status = STATUS_AUTHORIZING.to_string();

        let authorization = self.api.upload_url(&file.name).await;
        let url = match authorization {
            Ok(url) => url,
            Err(err) => return Err(self.fail(&file, None, err)),
        };

        self.transition(UploadState::Uploading);
        self.status = STATUS_UPLOADING.to_string();

        let transfer = self.api.put_file(&url, &file).await;
        match transfer {
            Ok(status) if status.is_success() => {}
            Ok(status) => return Err(self.fail(&file, Some(url), UploadError::Rejected(status))),
            Err(err) => return Err(self.fail(&file, Some(url), err)),
        }

        let attempt = Self::attempt(&file, Some(url), true);
        tracing::info!(
            "Uploaded {} ({} bytes, {})",
            attempt.file_name,
            attempt.file_size,
            attempt.file_type
        );

        self.transition(UploadState::Completed);
        self.status = STATUS_COMPLETED.to_string();
        self.last_attempt = Some(attempt.clone());

        // The store may not list the new object yet; a later refresh will
        if let Err(e) = self.refresh_listing().await {
            tracing::warn!("Listing refresh after upload failed: {}", e);
        }

        Ok(attempt)
    }

    /// Re-fetch the listing. On failure the previous listing is kept.
    pub async fn refresh_listing(&mut self) -> Result<&[ObjectSummary], UploadError> {
        let listing = self.api.list_objects().await;
        match listing {
            Ok(objects) => {
                self.objects = objects;
                Ok(&self.objects)
            }
            Err(e) => {
                tracing::error!("Error fetching objects: {}", e);
                Err(e)
            }
        }
    }

    fn fail(&mut self, file: &SelectedFile, url: Option<String>, err: UploadError) -> UploadError {
        tracing::warn!("Upload of {} failed: {}", file.name, err);

        self.transition(UploadState::Failed);
        self.status.clear();
        self.error = Some(err.to_string());
        self.last_attempt = Some(Self::attempt(file, url, false));
        err
    }

    fn attempt(
        file: &SelectedFile,
        presigned_url: Option<String>,
        succeeded: bool,
    ) -> UploadAttempt {
        UploadAttempt {
            file_name: file.name.clone(),
            file_size: file.size(),
            file_type: file.content_type().to_string(),
            presigned_url,
            succeeded,
            timestamp: Utc::now(),
        }
    }
}
