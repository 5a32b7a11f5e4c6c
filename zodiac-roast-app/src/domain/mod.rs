mod image;
mod rate_limit;
mod roast_record;
mod zodiac;

pub use image::{GeneratedImage, StoredBlob};
pub use rate_limit::RateLimitStatus;
pub use roast_record::{
    RoastRecord, RoastStatus, RoastSubject, RoastSubmission, ValidatedSubmission,
    FALLBACK_ROAST_TEXT, PLACEHOLDER_ROAST_TEXT,
};
pub use zodiac::{parse_birthdate, ZodiacSign};
