use super::UploadError;
use bytes::Bytes;
use std::path::Path;

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A local file picked for upload
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub data: Bytes,
    pub content_type: Option<String>,
}

impl SelectedFile {
    /// Content type is guessed from the file name's extension
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let name = name.into();
        let content_type = mime_guess::from_path(&name)
            .first()
            .map(|mime| mime.essence_str().to_string());

        Self {
            name,
            data: data.into(),
            content_type,
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, UploadError> {
        let path = path.as_ref();
        let data = tokio::fs::read(path)
            .await
            .map_err(|source| UploadError::ReadFile {
                path: path.to_path_buf(),
                source,
            })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self::new(name, data))
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Header value sent with the transfer
    pub fn content_type(&self) -> &str {
        self.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE)
    }
}

/// Human readable size, base 1024, at most two decimals
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut exponent = 0;
    let mut scaled = bytes;
    while scaled >= 1024 && exponent < UNITS.len() - 1 {
        scaled /= 1024;
        exponent += 1;
    }
    let value = bytes as f64 / 1024f64.powi(exponent as i32);

    let formatted = format!("{:.2}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[exponent])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(1000), "1000 Bytes");
        assert_eq!(format_file_size(2048), "2 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3 GB");
        assert_eq!(format_file_size(2048 * 1024 * 1024 * 1024), "2048 GB");
    }

    #[test]
    fn test_content_type_guess() {
        let pdf = SelectedFile::new("report.pdf", vec![0u8; 2048]);
        assert_eq!(pdf.content_type(), "application/pdf");
        assert_eq!(pdf.size(), 2048);

        let unknown = SelectedFile::new("blob", Bytes::from_static(b"x"));
        assert!(unknown.content_type.is_none());
        assert_eq!(unknown.content_type(), DEFAULT_CONTENT_TYPE);
    }

    #[tokio::test]
    async fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();

        let file = SelectedFile::from_path(&path).await.unwrap();
        assert_eq!(file.name, "notes.txt");
        assert_eq!(file.size(), 5);
        assert_eq!(file.content_type(), "text/plain");
    }

    #[tokio::test]
    async fn test_from_missing_path() {
        let result = SelectedFile::from_path("/nonexistent/file.bin").await;
        assert!(matches!(result, Err(UploadError::ReadFile { .. })));
    }
}
