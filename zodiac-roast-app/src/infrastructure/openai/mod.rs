mod client;
mod images;
pub mod prompt;
mod types;

pub use client::{OpenAiClient, DEFAULT_IMAGE_MODEL, DEFAULT_OPENAI_BASE_URL, DEFAULT_TEXT_MODEL};
