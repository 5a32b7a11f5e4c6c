//! In-process stand-ins for the AI vendors and blob store.

use crate::application::{BlobStore, ImageProvider, TextGenerator};
use crate::domain::{GeneratedImage, RoastSubject, StoredBlob};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use zodiac_roast_errors::AppError;

/// Replays scripted results, then keeps returning `fallback`.
pub struct ScriptedTextGenerator {
    script: Mutex<VecDeque<Result<String, AppError>>>,
    fallback: Result<String, AppError>,
    calls: AtomicUsize,
}

impl ScriptedTextGenerator {
    pub fn always(text: &str) -> Self {
        Self::new(Vec::new(), Ok(text.to_string()))
    }

    pub fn new(script: Vec<Result<String, AppError>>, fallback: Result<String, AppError>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for ScriptedTextGenerator {
    async fn generate_roast(&self, subject: &RoastSubject) -> Result<String, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .script
            .lock()
            .map_err(|_| AppError::Internal("script lock poisoned".to_string()))?
            .pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
            .map(|text| text.replace("{name}", &subject.name))
    }
}

pub struct StaticImageProvider {
    result: Result<GeneratedImage, AppError>,
    calls: AtomicUsize,
}

impl StaticImageProvider {
    pub fn png() -> Self {
        Self::returning(Ok(GeneratedImage {
            bytes: b"\x89PNG fake".to_vec(),
            content_type: "image/png".to_string(),
        }))
    }

    pub fn failing() -> Self {
        Self::returning(Err(AppError::ImageGeneration("vendor down".to_string())))
    }

    pub fn returning(result: Result<GeneratedImage, AppError>) -> Self {
        Self {
            result,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageProvider for StaticImageProvider {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn generate_caricature(&self, _subject: &RoastSubject) -> Result<GeneratedImage, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

/// Keeps blobs in memory and hands out `memory://` URLs.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<Vec<(String, GeneratedImage)>>,
    next_id: AtomicUsize,
}

impl MemoryBlobStore {
    pub fn len(&self) -> usize {
        self.blobs.lock().map(|b| b.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn store(&self, image: GeneratedImage) -> Result<StoredBlob, AppError> {
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| AppError::Storage("blob lock poisoned".to_string()))?;
        let storage_ref = format!("blob-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        blobs.push((storage_ref.clone(), image));
        Ok(StoredBlob {
            url: format!("memory://{storage_ref}"),
            storage_ref,
        })
    }

    async fn delete(&self, storage_ref: &str) -> Result<(), AppError> {
        self.blobs
            .lock()
            .map_err(|_| AppError::Storage("blob lock poisoned".to_string()))?
            .retain(|(existing, _)| existing != storage_ref);
        Ok(())
    }
}
