// src/application/ports/media_storage.rs
use crate::application::ApplicationResult;
use async_trait::async_trait;
use bytes::Bytes;

/// One uploaded file as received from the client.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub original_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Persist the upload and return the stored filename.
    async fn store(&self, upload: MediaUpload) -> ApplicationResult<String>;

    async fn remove(&self, filename: &str) -> ApplicationResult<()>;

    fn public_url(&self, filename: &str) -> String;
}
