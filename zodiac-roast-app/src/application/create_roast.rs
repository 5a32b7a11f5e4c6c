use super::jobs::{RoastJob, WorkQueue};
use crate::domain::{RoastRecord, RoastSubmission};
use crate::infrastructure::clock::Clock;
use crate::infrastructure::db::{db_error, RoastRepository};
use crate::infrastructure::security::{InputSanitizer, RateLimiter};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;
use zodiac_roast_errors::AppError;

/// The synchronous write path: validate, rate-limit, insert a placeholder,
/// queue content generation.
pub struct CreateRoast {
    repo: RoastRepository,
    rate_limiter: RateLimiter,
    clock: Arc<dyn Clock>,
    queue: WorkQueue,
    /// Serialises check-then-insert and holds the last assigned `created_at`.
    last_created_at: Mutex<i64>,
}

impl CreateRoast {
    pub fn new(
        repo: RoastRepository,
        rate_limiter: RateLimiter,
        clock: Arc<dyn Clock>,
        queue: WorkQueue,
    ) -> Self {
        Self {
            repo,
            rate_limiter,
            clock,
            queue,
            last_created_at: Mutex::new(i64::MIN),
        }
    }

    pub async fn execute(&self, submission: RoastSubmission) -> Result<Uuid, AppError> {
        let validated = InputSanitizer::validate_submission(&submission)?;

        if [&validated.name, &validated.hobbies, &validated.nationality]
            .iter()
            .any(|field| InputSanitizer::contains_injection_attempt(field))
        {
            tracing::warn!("Potential prompt injection in roast submission; it will be filtered");
        }

        if self.queue.is_closed() {
            return Err(AppError::Internal("server is shutting down".to_string()));
        }

        let record = {
            let mut last_created_at = self.last_created_at.lock().await;
            let created_at = self
                .clock
                .now_millis()
                .max(last_created_at.saturating_add(1));

            self.rate_limiter.check_rate_limit(created_at).await?;

            let record = RoastRecord::new_pending(validated, created_at);
            self.repo.create(&record).await.map_err(db_error)?;
            *last_created_at = created_at;
            record
        };

        tracing::info!(
            "Created roast {} ({}) for {}",
            record.id,
            record.zodiac_sign,
            record.name
        );

        if let Err(e) = self.queue.enqueue(RoastJob::GenerateContent(record.subject())) {
            tracing::error!("Roast {} stays pending: {}", record.id, e);
        }

        Ok(record.id)
    }
}
