use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitStatus {
    pub allowed: bool,
    pub count_in_window: u64,
    /// Estimated moment (ms epoch) a slot frees up. Only set when not allowed.
    pub reset_at: Option<i64>,
}
