use crate::domain::{GeneratedImage, RoastSubject, StoredBlob};
use async_trait::async_trait;
use zodiac_roast_errors::AppError;

/// Produces roast text. One call is one attempt; retries live in the workflow.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_roast(&self, subject: &RoastSubject) -> Result<String, AppError>;
}

/// Produces a caricature for a roast subject, returning the downloaded bytes.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn generate_caricature(&self, subject: &RoastSubject) -> Result<GeneratedImage, AppError>;
}

/// Persists image bytes and hands back a retrievable URL.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn store(&self, image: GeneratedImage) -> Result<StoredBlob, AppError>;

    /// Removes a blob no record points to.
    async fn delete(&self, storage_ref: &str) -> Result<(), AppError>;
}
