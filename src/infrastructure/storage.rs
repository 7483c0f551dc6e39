// src/infrastructure/storage.rs
use crate::application::{
    error::{ApplicationError, ApplicationResult},
    ports::media_storage::{MediaStorage, MediaUpload},
};
use async_trait::async_trait;
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tokio::{
    fs,
    io::{AsyncWrite, AsyncWriteExt},
};
use uuid::Uuid;

const MAX_STEM_LEN: usize = 48;

/// Stores uploads as files under a root directory and serves them from a
/// fixed URL prefix.
#[derive(Debug, Clone)]
pub struct LocalMediaStorage {
    root: PathBuf,
    base_url: String,
}

impl LocalMediaStorage {
    pub async fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> ApplicationResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .await
            .map_err(|err| ApplicationError::infrastructure(format!("media root: {err}")))?;

        Ok(Self {
            root,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn path_for(&self, filename: &str) -> ApplicationResult<PathBuf> {
        if filename.is_empty()
            || filename.contains(['/', '\\'])
            || filename.starts_with('.')
        {
            return Err(ApplicationError::validation("invalid media filename"));
        }
        Ok(self.root.join(filename))
    }
}

/// `<uuid>-<slugged stem>.<ext>`; the original name only contributes a
/// readable hint.
fn stored_filename(original_name: &str) -> String {
    let path = Path::new(original_name);
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(slug::slugify)
        .unwrap_or_default();
    let stem: String = stem.chars().take(MAX_STEM_LEN).collect();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(slug::slugify)
        .filter(|ext| !ext.is_empty());

    let mut name = Uuid::new_v4().to_string();
    if !stem.is_empty() {
        name.push('-');
        name.push_str(stem.trim_end_matches('-'));
    }
    if let Some(extension) = extension {
        name.push('.');
        name.push_str(&extension);
    }
    name
}

/// Fills a freshly created file. A failed write removes the file again, so
/// no unreferenced partial upload stays behind.
async fn write_or_discard<W>(mut file: W, path: &Path, bytes: &[u8]) -> ApplicationResult<()>
where
    W: AsyncWrite + Unpin,
{
    let written = match file.write_all(bytes).await {
        Ok(()) => file.flush().await,
        Err(err) => Err(err),
    };
    drop(file);

    let Err(err) = written else {
        return Ok(());
    };
    match fs::remove_file(path).await {
        Ok(()) => {}
        Err(remove_err) if remove_err.kind() == ErrorKind::NotFound => {}
        Err(remove_err) => {
            tracing::warn!(
                path = %path.display(),
                error = %remove_err,
                "partial media file left on disk"
            );
        }
    }
    Err(ApplicationError::infrastructure(format!("write media file: {err}")))
}

#[async_trait]
impl MediaStorage for LocalMediaStorage {
    async fn store(&self, upload: MediaUpload) -> ApplicationResult<String> {
        let filename = stored_filename(&upload.original_name);
        let path = self.path_for(&filename)?;

        let file = fs::File::create(&path)
            .await
            .map_err(|err| ApplicationError::infrastructure(format!("create media file: {err}")))?;
        write_or_discard(file, &path, &upload.bytes).await?;

        tracing::debug!(%filename, bytes = upload.bytes.len(), "media stored");
        Ok(filename)
    }

    async fn remove(&self, filename: &str) -> ApplicationResult<()> {
        let path = self.path_for(filename)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(ApplicationError::infrastructure(format!(
                "remove media file: {err}"
            ))),
        }
    }

    fn public_url(&self, filename: &str) -> String {
        format!("{}/{filename}", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use std::{
        io,
        pin::Pin,
        task::{Context, Poll},
    };

    struct DiskFull;

    impl AsyncWrite for DiskFull {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            Poll::Ready(Err(io::Error::other("no space left on device")))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[test]
    fn stored_names_are_slugged_and_unique() {
        let first = stored_filename("Tarta de Santiago (1).JPG");
        let second = stored_filename("Tarta de Santiago (1).JPG");
        assert!(first.ends_with("-tarta-de-santiago-1.jpg"));
        assert_ne!(first, second);
        assert!(!stored_filename("../../etc/passwd").contains('/'));
    }

    #[tokio::test]
    async fn store_and_remove_round_trip_on_disk() {
        let root = std::env::temp_dir().join(format!("pastry-media-{}", Uuid::new_v4()));
        let storage = LocalMediaStorage::new(&root, "/uploads/").await.unwrap();

        let filename = storage
            .store(MediaUpload {
                original_name: "bun.png".into(),
                content_type: Some("image/png".into()),
                bytes: Bytes::from_static(b"png"),
            })
            .await
            .unwrap();
        assert_eq!(fs::read(root.join(&filename)).await.unwrap(), b"png");
        assert_eq!(storage.public_url(&filename), format!("/uploads/{filename}"));

        storage.remove(&filename).await.unwrap();
        assert!(!root.join(&filename).exists());
        // Already gone is fine.
        storage.remove(&filename).await.unwrap();

        assert!(storage.remove("../escape").await.is_err());
        let _ = fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn failed_write_removes_the_partial_file() {
        let root = std::env::temp_dir().join(format!("pastry-media-{}", Uuid::new_v4()));
        fs::create_dir_all(&root).await.unwrap();
        let path = root.join("half-written.jpg");
        fs::write(&path, b"\xff\xd8").await.unwrap();

        let err = write_or_discard(DiskFull, &path, b"jpeg bytes")
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Infrastructure(_)));
        assert!(!path.exists());
        assert!(fs::read_dir(&root).await.unwrap().next_entry().await.unwrap().is_none());

        let _ = fs::remove_dir_all(&root).await;
    }
}
