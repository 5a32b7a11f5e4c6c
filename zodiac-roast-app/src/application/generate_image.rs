use super::ports::{BlobStore, ImageProvider};
use crate::domain::{RoastSubject, StoredBlob};
use crate::infrastructure::db::{db_error, RoastRepository};
use std::sync::Arc;
use zodiac_roast_errors::AppError;

/// Best-effort caricature step. Failures are logged and leave the roast
/// without image fields.
pub struct GenerateImage {
    repo: RoastRepository,
    provider: Option<Arc<dyn ImageProvider>>,
    blob_store: Arc<dyn BlobStore>,
}

impl GenerateImage {
    pub fn new(
        repo: RoastRepository,
        provider: Option<Arc<dyn ImageProvider>>,
        blob_store: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            repo,
            provider,
            blob_store,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    pub async fn execute(&self, subject: &RoastSubject) -> Option<StoredBlob> {
        let provider = self.provider.as_ref()?;

        match self.generate(provider.as_ref(), subject).await {
            Ok(blob) => {
                tracing::info!(
                    "Roast {} caricature ready via {}",
                    subject.roast_id,
                    provider.name()
                );
                Some(blob)
            }
            Err(e) => {
                tracing::warn!(
                    "Caricature for roast {} skipped ({}): {}",
                    subject.roast_id,
                    provider.name(),
                    e
                );
                None
            }
        }
    }

    async fn generate(
        &self,
        provider: &dyn ImageProvider,
        subject: &RoastSubject,
    ) -> Result<StoredBlob, AppError> {
        let image = provider.generate_caricature(subject).await?;
        let blob = self.blob_store.store(image).await?;

        if let Err(e) = self.repo.patch_image(subject.roast_id, &blob).await {
            if let Err(cleanup) = self.blob_store.delete(&blob.storage_ref).await {
                tracing::warn!("Orphaned caricature {} left behind: {}", blob.storage_ref, cleanup);
            }
            return Err(db_error(e));
        }
        Ok(blob)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RoastRecord, ValidatedSubmission};
    use crate::infrastructure::db::connect_in_memory;
    use crate::testing::{MemoryBlobStore, StaticImageProvider};
    use chrono::NaiveDate;

    async fn setup() -> (RoastRepository, Arc<StaticImageProvider>, Arc<MemoryBlobStore>, GenerateImage) {
        let repo = RoastRepository::new(connect_in_memory().await.unwrap());
        let provider = Arc::new(StaticImageProvider::png());
        let blobs = Arc::new(MemoryBlobStore::default());
        let step = GenerateImage::new(repo.clone(), Some(provider.clone()), blobs.clone());
        (repo, provider, blobs, step)
    }

    #[tokio::test]
    async fn test_image_patched_and_blob_kept() {
        let (repo, _, blobs, step) = setup().await;
        let record = RoastRecord::new_pending(
            ValidatedSubmission {
                name: "Bo".to_string(),
                birthdate: NaiveDate::from_ymd_opt(1993, 10, 30).unwrap(),
                hobbies: "true crime podcasts".to_string(),
                nationality: "Swedish".to_string(),
            },
            1_000,
        );
        repo.create(&record).await.unwrap();

        let blob = step.execute(&record.subject()).await.unwrap();

        let stored = repo.find_by_id(record.id).await.unwrap().unwrap();
        assert_eq!(stored.image_storage_ref.as_deref(), Some(blob.storage_ref.as_str()));
        assert_eq!(blobs.len(), 1);
    }

    #[tokio::test]
    async fn test_blob_removed_when_record_patch_fails() {
        let (_, provider, blobs, step) = setup().await;
        let orphan = RoastSubject {
            roast_id: uuid::Uuid::new_v4(),
            name: "Nobody".to_string(),
            hobbies: "vanishing".to_string(),
            nationality: "Unknown".to_string(),
            zodiac_sign: crate::domain::ZodiacSign::Pisces,
        };

        assert!(step.execute(&orphan).await.is_none());
        assert_eq!(provider.calls(), 1);
        assert!(blobs.is_empty());
    }
}
