use crate::application::BlobStore;
use crate::domain::{GeneratedImage, StoredBlob};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use url::Url;
use zodiac_roast_errors::AppError;

/// URL prefix under which the HTTP layer serves the blob directory.
pub const IMAGE_ROUTE: &str = "/images";

/// Writes images into a directory that the API serves under [`IMAGE_ROUTE`].
pub struct LocalBlobStore {
    root: PathBuf,
    public_base_url: Url,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: Url) -> Self {
        Self {
            root: root.into(),
            public_base_url,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn public_url(&self, storage_ref: &str) -> Result<String, AppError> {
        let path = format!("{}/{}", IMAGE_ROUTE.trim_start_matches('/'), storage_ref);
        let mut base = self.public_base_url.clone();
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        base.join(&path)
            .map(|u| u.to_string())
            .map_err(|e| AppError::Storage(e.to_string()))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn store(&self, image: GeneratedImage) -> Result<StoredBlob, AppError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| AppError::Storage(format!("{}: {e}", self.root.display())))?;

        let storage_ref = format!("{}.{}", uuid::Uuid::new_v4(), image.extension());
        let path = self.root.join(&storage_ref);
        tokio::fs::write(&path, &image.bytes)
            .await
            .map_err(|e| AppError::Storage(format!("{}: {e}", path.display())))?;

        tracing::info!("Stored caricature {} ({} bytes)", storage_ref, image.bytes.len());

        Ok(StoredBlob {
            url: self.public_url(&storage_ref)?,
            storage_ref,
        })
    }

    async fn delete(&self, storage_ref: &str) -> Result<(), AppError> {
        // Refs are bare file names inside `root`.
        if Path::new(storage_ref).file_name().and_then(|n| n.to_str()) != Some(storage_ref) {
            return Err(AppError::Storage(format!("invalid blob ref: {storage_ref}")));
        }

        let path = self.root.join(storage_ref);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!("{}: {e}", path.display()))),
        }
    }
}
