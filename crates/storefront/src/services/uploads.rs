//! Product image uploads.
//!
//! Development writes files to a local directory served under `/uploads`.
//! Production pushes files to the hosted image CDN and stores the returned
//! URL, so app instances stay stateless.

use std::path::PathBuf;

use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::config::{ImageCdnConfig, UploadConfig};

/// Accepted image content types and their file extensions.
const ALLOWED_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/webp", "webp"),
    ("image/gif", "gif"),
];

/// Maximum accepted upload size in bytes (5 MiB).
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Errors that can occur during image upload.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Upload contained no data.
    #[error("uploaded file is empty")]
    EmptyFile,

    /// Upload exceeds the size limit.
    #[error("uploaded file exceeds {MAX_UPLOAD_BYTES} bytes")]
    TooLarge,

    /// Content type is not an accepted image format.
    #[error("unsupported content type: {0}")]
    UnsupportedType(String),

    /// Local filesystem write failed.
    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),

    /// CDN request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// CDN returned an error response.
    #[error("image host error: {status} - {message}")]
    Api { status: u16, message: String },

    /// CDN response could not be parsed.
    #[error("unexpected image host response: {0}")]
    Parse(String),
}

fn extension_for(content_type: &str) -> Result<&'static str, UploadError> {
    ALLOWED_TYPES
        .iter()
        .find(|(mime, _)| *mime == content_type)
        .map(|(_, ext)| *ext)
        .ok_or_else(|| UploadError::UnsupportedType(content_type.to_string()))
}

#[derive(Debug, Deserialize)]
struct CdnResponse {
    secure_url: String,
}

/// Stores uploaded product images and returns their public URL.
#[derive(Clone)]
pub struct UploadService {
    local_dir: PathBuf,
    cdn: Option<CdnClient>,
}

#[derive(Clone)]
struct CdnClient {
    client: reqwest::Client,
    config: ImageCdnConfig,
}

impl UploadService {
    /// Create a new upload service. The CDN backend is used whenever it is
    /// configured, otherwise files land on local disk.
    #[must_use]
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            local_dir: config.local_dir.clone(),
            cdn: config.cdn.as_ref().map(|cdn| CdnClient {
                client: reqwest::Client::new(),
                config: cdn.clone(),
            }),
        }
    }

    /// Store one image and return its public URL.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError`] when the file is empty, too large, of an
    /// unsupported type, or the storage backend fails.
    pub async fn store_image(
        &self,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<String, UploadError> {
        if data.is_empty() {
            return Err(UploadError::EmptyFile);
        }
        if data.len() > MAX_UPLOAD_BYTES {
            return Err(UploadError::TooLarge);
        }
        let extension = extension_for(content_type)?;

        match &self.cdn {
            Some(cdn) => cdn.upload(content_type, data).await,
            None => self.store_local(extension, data).await,
        }
    }

    async fn store_local(&self, extension: &str, data: Vec<u8>) -> Result<String, UploadError> {
        let file_name = format!("{}.{extension}", Uuid::new_v4());
        let path = self.local_dir.join(&file_name);

        tokio::fs::create_dir_all(&self.local_dir).await?;
        tokio::fs::write(&path, data).await?;

        Ok(format!("/uploads/{file_name}"))
    }
}

impl CdnClient {
    async fn upload(&self, content_type: &str, data: Vec<u8>) -> Result<String, UploadError> {
        let part = reqwest::multipart::Part::bytes(data)
            .file_name("upload")
            .mime_str(content_type)?;
        let form = reqwest::multipart::Form::new()
            .text("api_key", self.config.api_key.expose_secret().to_string())
            .text("folder", self.config.folder.clone())
            .part("file", part);

        let response = self
            .client
            .post(self.config.upload_url.clone())
            .multipart(form)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(UploadError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: CdnResponse = response
            .json()
            .await
            .map_err(|e| UploadError::Parse(e.to_string()))?;

        Ok(body.secure_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_for_known_types() {
        assert_eq!(extension_for("image/jpeg").unwrap(), "jpg");
        assert_eq!(extension_for("image/webp").unwrap(), "webp");
    }

    #[test]
    fn test_extension_for_rejects_unknown_type() {
        assert!(matches!(
            extension_for("application/pdf"),
            Err(UploadError::UnsupportedType(_))
        ));
    }

    #[tokio::test]
    async fn test_store_image_rejects_empty_file() {
        let service = UploadService::new(&UploadConfig {
            local_dir: std::env::temp_dir().join("prodavnica-test-uploads"),
            cdn: None,
        });
        assert!(matches!(
            service.store_image("image/png", Vec::new()).await,
            Err(UploadError::EmptyFile)
        ));
    }

    #[tokio::test]
    async fn test_store_image_writes_local_file() {
        let dir = std::env::temp_dir().join(format!("prodavnica-uploads-{}", Uuid::new_v4()));
        let service = UploadService::new(&UploadConfig {
            local_dir: dir.clone(),
            cdn: None,
        });

        let url = service
            .store_image("image/png", vec![1, 2, 3])
            .await
            .expect("store");

        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with(".png"));

        let file_name = url.trim_start_matches("/uploads/");
        let written = tokio::fs::read(dir.join(file_name)).await.expect("read");
        assert_eq!(written, vec![1, 2, 3]);

        tokio::fs::remove_dir_all(dir).await.expect("cleanup");
    }
}
