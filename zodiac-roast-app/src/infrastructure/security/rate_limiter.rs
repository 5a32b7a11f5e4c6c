use crate::domain::RateLimitStatus;
use crate::infrastructure::db::{db_error, RoastRepository};
use std::time::Duration;
use zodiac_roast_errors::AppError;

/// Trailing window the limit applies to. Shared by the advisory check and
/// the authoritative check at creation time.
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(3 * 60 * 60);
pub const MAX_ROASTS_PER_WINDOW: u64 = 20;

const WINDOW_MILLIS: i64 = RATE_LIMIT_WINDOW.as_millis() as i64;

/// Global creation limit evaluated against the roast store.
#[derive(Clone)]
pub struct RateLimiter {
    repo: RoastRepository,
}

impl RateLimiter {
    pub fn new(repo: RoastRepository) -> Self {
        Self { repo }
    }

    pub async fn evaluate(&self, now: i64) -> Result<RateLimitStatus, AppError> {
        let (count, oldest) = self
            .repo
            .window_stats(now - WINDOW_MILLIS)
            .await
            .map_err(db_error)?;
        Ok(decide(count, oldest))
    }

    pub async fn check_rate_limit(&self, now: i64) -> Result<RateLimitStatus, RateLimitError> {
        let status = self.evaluate(now).await.map_err(RateLimitError::Store)?;
        if status.allowed {
            Ok(status)
        } else {
            Err(RateLimitError::LimitReached {
                reset_at: status.reset_at,
            })
        }
    }
}

/// `reset_at` is the moment the oldest roast in the window ages out. With
/// several roasts sharing the window that frees one slot at most, so it is
/// an estimate.
pub fn decide(count_in_window: u64, oldest_in_window: Option<i64>) -> RateLimitStatus {
    let allowed = count_in_window < MAX_ROASTS_PER_WINDOW;
    RateLimitStatus {
        allowed,
        count_in_window,
        reset_at: if allowed {
            None
        } else {
            oldest_in_window.map(|oldest| oldest + WINDOW_MILLIS)
        },
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum RateLimitError {
    #[error("rate limit reached")]
    LimitReached { reset_at: Option<i64> },
    #[error(transparent)]
    Store(AppError),
}

impl From<RateLimitError> for AppError {
    fn from(err: RateLimitError) -> Self {
        match err {
            RateLimitError::LimitReached { reset_at } => AppError::RateLimitExceeded { reset_at },
            RateLimitError::Store(inner) => inner,
        }
    }
}
