use super::PastryCommandService;
use crate::application::{
    error::{ApplicationError, ApplicationResult},
    ports::media_storage::MediaUpload,
};

pub const MAX_MEDIA_PER_PASTRY: usize = 10;

pub(super) fn validate_uploads(uploads: &[MediaUpload]) -> ApplicationResult<()> {
    for upload in uploads {
        let is_image = upload
            .content_type
            .as_deref()
            .is_some_and(|content_type| content_type.starts_with("image/"));
        if !is_image {
            return Err(ApplicationError::validation(format!(
                "media file '{}' is not an image",
                upload.original_name
            )));
        }
        if upload.bytes.is_empty() {
            return Err(ApplicationError::validation(format!(
                "media file '{}' is empty",
                upload.original_name
            )));
        }
    }
    Ok(())
}

impl PastryCommandService {
    /// Store every upload. If one fails, the files already written are removed
    /// before the error is returned.
    pub(super) async fn store_uploads(
        &self,
        uploads: Vec<MediaUpload>,
    ) -> ApplicationResult<Vec<String>> {
        let mut stored = Vec::with_capacity(uploads.len());
        for upload in uploads {
            match self.storage.store(upload).await {
                Ok(filename) => stored.push(filename),
                Err(err) => {
                    self.discard_files(&stored).await;
                    return Err(err);
                }
            }
        }
        Ok(stored)
    }

    /// Best-effort removal; failures are logged and swallowed.
    pub(super) async fn discard_files(&self, filenames: &[String]) {
        for filename in filenames {
            if let Err(err) = self.storage.remove(filename).await {
                tracing::warn!(%filename, error = %err, "failed to remove media file");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn upload(content_type: Option<&str>, bytes: &'static [u8]) -> MediaUpload {
        MediaUpload {
            original_name: "photo.jpg".into(),
            content_type: content_type.map(str::to_string),
            bytes: Bytes::from_static(bytes),
        }
    }

    #[test]
    fn only_non_empty_images_are_accepted() {
        assert!(validate_uploads(&[upload(Some("image/jpeg"), b"x")]).is_ok());
        assert!(validate_uploads(&[upload(Some("text/plain"), b"x")]).is_err());
        assert!(validate_uploads(&[upload(None, b"x")]).is_err());
        assert!(validate_uploads(&[upload(Some("image/png"), b"")]).is_err());
    }
}
