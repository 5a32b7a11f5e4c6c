mod client;
mod types;

pub use client::{PollSettings, ReplicateClient, DEFAULT_REPLICATE_MODEL_VERSION};
