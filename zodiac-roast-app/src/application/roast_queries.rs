use crate::domain::{RateLimitStatus, RoastRecord};
use crate::infrastructure::clock::Clock;
use crate::infrastructure::db::{db_error, RoastRepository};
use crate::infrastructure::security::RateLimiter;
use std::sync::Arc;
use uuid::Uuid;
use zodiac_roast_errors::AppError;

/// Size of the public leaderboard.
pub const LEADERBOARD_LIMIT: u64 = 50;

pub struct RoastQueries {
    repo: RoastRepository,
    rate_limiter: RateLimiter,
    clock: Arc<dyn Clock>,
}

impl RoastQueries {
    pub fn new(repo: RoastRepository, rate_limiter: RateLimiter, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo,
            rate_limiter,
            clock,
        }
    }

    pub async fn list_roasts(&self) -> Result<Vec<RoastRecord>, AppError> {
        self.repo
            .list_recent(LEADERBOARD_LIMIT)
            .await
            .map_err(db_error)
    }

    pub async fn get_roast(&self, id: Uuid) -> Result<RoastRecord, AppError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(db_error)?
            .ok_or(AppError::NotFound)
    }

    /// Advisory check for display; creation re-checks with the same limiter.
    pub async fn check_rate_limit(&self) -> Result<RateLimitStatus, AppError> {
        self.rate_limiter.evaluate(self.clock.now_millis()).await
    }
}
