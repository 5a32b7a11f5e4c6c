mod input_sanitizer;
mod rate_limiter;

pub use input_sanitizer::InputSanitizer;
pub use rate_limiter::{
    decide, RateLimitError, RateLimiter, MAX_ROASTS_PER_WINDOW, RATE_LIMIT_WINDOW,
};
