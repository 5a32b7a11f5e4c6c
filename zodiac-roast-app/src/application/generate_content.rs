use super::ports::TextGenerator;
use crate::domain::{RoastStatus, RoastSubject, FALLBACK_ROAST_TEXT};
use crate::infrastructure::db::{db_error, RoastRepository};
use std::sync::Arc;
use std::time::Duration;
use zodiac_roast_errors::AppError;

/// Bounded retry for transient text-generation failures. The n-th retry
/// waits `backoff * n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff: Duration::from_millis(500),
        }
    }
}

pub struct GenerateContent {
    repo: RoastRepository,
    text_generator: Option<Arc<dyn TextGenerator>>,
    retry: RetryPolicy,
}

impl GenerateContent {
    pub fn new(
        repo: RoastRepository,
        text_generator: Option<Arc<dyn TextGenerator>>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            repo,
            text_generator,
            retry,
        }
    }

    /// Writes the one and only content patch for a roast and reports which
    /// terminal text it received.
    pub async fn execute(&self, subject: &RoastSubject) -> Result<RoastStatus, AppError> {
        let (roast_text, status) = match self.generate(subject).await {
            Ok(text) => (text, RoastStatus::ContentReady),
            Err(e) => {
                tracing::warn!("Roast {} falls back to apology text: {}", subject.roast_id, e);
                (FALLBACK_ROAST_TEXT.to_string(), RoastStatus::ContentFailed)
            }
        };

        self.repo
            .patch_content(subject.roast_id, &roast_text, status)
            .await
            .map_err(db_error)?;

        tracing::info!("Roast {} content patched ({})", subject.roast_id, status.as_str());
        Ok(status)
    }

    async fn generate(&self, subject: &RoastSubject) -> Result<String, AppError> {
        let Some(generator) = &self.text_generator else {
            return Err(AppError::text_generation(
                "no text generation credential configured",
            ));
        };

        let mut retries = 0;
        loop {
            match generator.generate_roast(subject).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_retryable() && retries < self.retry.max_retries => {
                    retries += 1;
                    tracing::warn!(
                        "Text generation for roast {} failed ({}), retry {}/{}",
                        subject.roast_id,
                        e,
                        retries,
                        self.retry.max_retries
                    );
                    tokio::time::sleep(self.retry.backoff * retries).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
