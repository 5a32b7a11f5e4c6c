use super::ZodiacSign;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use zodiac_roast_errors::AppError;

pub const PLACEHOLDER_ROAST_TEXT: &str = "Generating your roast...";
pub const FALLBACK_ROAST_TEXT: &str =
    "The roast generator is experiencing technical difficulties. Even AI needs a moment sometimes! 🤖💔";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoastStatus {
    Pending,
    ContentReady,
    ContentFailed,
    ImageReady,
}

impl RoastStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::ContentReady => "content_ready",
            Self::ContentFailed => "content_failed",
            Self::ImageReady => "image_ready",
        }
    }

    /// Status as implied by the roast text alone, for rows written before
    /// the status column existed.
    pub fn infer(roast_text: &str, has_image: bool) -> Self {
        match roast_text {
            PLACEHOLDER_ROAST_TEXT => Self::Pending,
            FALLBACK_ROAST_TEXT => Self::ContentFailed,
            _ if has_image => Self::ImageReady,
            _ => Self::ContentReady,
        }
    }
}

impl FromStr for RoastStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "content_ready" => Ok(Self::ContentReady),
            "content_failed" => Ok(Self::ContentFailed),
            "image_ready" => Ok(Self::ImageReady),
            other => Err(AppError::Internal(format!("Unknown roast status: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoastRecord {
    pub id: uuid::Uuid,
    pub name: String,
    pub birthdate: NaiveDate,
    pub hobbies: String,
    pub nationality: String,
    pub zodiac_sign: ZodiacSign,
    pub roast_text: String,
    pub status: RoastStatus,
    pub image_url: Option<String>,
    pub image_storage_ref: Option<String>,
    pub created_at: i64,
}

impl RoastRecord {
    /// A fresh record in the placeholder state. The zodiac sign is derived
    /// here and nowhere else.
    pub fn new_pending(submission: ValidatedSubmission, created_at: i64) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            zodiac_sign: ZodiacSign::from_date(submission.birthdate),
            name: submission.name,
            birthdate: submission.birthdate,
            hobbies: submission.hobbies,
            nationality: submission.nationality,
            roast_text: PLACEHOLDER_ROAST_TEXT.to_string(),
            status: RoastStatus::Pending,
            image_url: None,
            image_storage_ref: None,
            created_at,
        }
    }

    pub fn subject(&self) -> RoastSubject {
        RoastSubject {
            roast_id: self.id,
            name: self.name.clone(),
            hobbies: self.hobbies.clone(),
            nationality: self.nationality.clone(),
            zodiac_sign: self.zodiac_sign,
        }
    }
}

/// Raw form input as received from a client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoastSubmission {
    pub name: String,
    pub birthdate: String,
    pub hobbies: String,
    pub nationality: String,
}

/// Trimmed, length-checked submission with a parsed birthdate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSubmission {
    pub name: String,
    pub birthdate: NaiveDate,
    pub hobbies: String,
    pub nationality: String,
}

/// The fields the text and image generators get to see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoastSubject {
    pub roast_id: uuid::Uuid,
    pub name: String,
    pub hobbies: String,
    pub nationality: String,
    pub zodiac_sign: ZodiacSign,
}
