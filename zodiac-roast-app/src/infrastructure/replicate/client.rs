use super::types::{CreatePredictionRequest, Prediction, PredictionInput, PredictionStatus};
use crate::application::ImageProvider;
use crate::domain::{GeneratedImage, RoastSubject};
use crate::infrastructure::openai::prompt::build_diffusion_prompt;
use crate::infrastructure::storage::download_image;
use async_trait::async_trait;
use std::time::Duration;
use zodiac_roast_errors::AppError;

pub const DEFAULT_REPLICATE_BASE_URL: &str = "https://api.replicate.com/v1";
pub const DEFAULT_REPLICATE_MODEL_VERSION: &str =
    "stability-ai/sdxl:39ed52f2a78e934b3ba6e88e8f1b03e5e1410dc9e5a7f7b8e3d51d5e5c5c5c5c5";
const NEGATIVE_PROMPT: &str = "realistic, photo, offensive, inappropriate";

/// Fixed-interval polling budget for a submitted prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_attempts: 30,
        }
    }
}

/// Submit-then-poll image generation against the Replicate predictions API.
#[derive(Clone)]
pub struct ReplicateClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
    model_version: String,
    poll: PollSettings,
}

impl ReplicateClient {
    pub fn new(http_client: reqwest::Client, api_key: String) -> Self {
        Self {
            http_client,
            api_key,
            base_url: DEFAULT_REPLICATE_BASE_URL.to_string(),
            model_version: DEFAULT_REPLICATE_MODEL_VERSION.to_string(),
            poll: PollSettings::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model_version(mut self, version: impl Into<String>) -> Self {
        self.model_version = version.into();
        self
    }

    pub fn with_poll_settings(mut self, poll: PollSettings) -> Self {
        self.poll = poll;
        self
    }

    async fn submit(&self, subject: &RoastSubject) -> Result<Prediction, AppError> {
        let request = CreatePredictionRequest {
            version: self.model_version.clone(),
            input: PredictionInput {
                prompt: build_diffusion_prompt(subject),
                negative_prompt: NEGATIVE_PROMPT.to_string(),
            },
        };

        let response = self
            .http_client
            .post(format!("{}/predictions", self.base_url))
            .header("Authorization", format!("Token {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::ImageGeneration(e.to_string()))?;

        Self::parse_prediction(response).await
    }

    async fn fetch(&self, prediction_id: &str) -> Result<Prediction, AppError> {
        let response = self
            .http_client
            .get(format!("{}/predictions/{}", self.base_url, prediction_id))
            .header("Authorization", format!("Token {}", self.api_key))
            .send()
            .await
            .map_err(|e| AppError::ImageGeneration(e.to_string()))?;

        Self::parse_prediction(response).await
    }

    async fn parse_prediction(response: reqwest::Response) -> Result<Prediction, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Replicate error: {} - {}", status, body);
            return Err(AppError::ImageGeneration(format!("API error: {status}")));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::ImageGeneration(e.to_string()))
    }

    /// Polls until the prediction succeeds, fails, or the attempt budget runs
    /// out. A poll that errors uses up an attempt and polling carries on.
    async fn wait_for_output(&self, prediction: Prediction) -> Result<String, AppError> {
        let id = prediction.id.clone();

        for attempt in 1..=self.poll.max_attempts {
            tokio::time::sleep(self.poll.interval).await;

            let current = match self.fetch(&id).await {
                Ok(current) => current,
                Err(e) => {
                    tracing::warn!(
                        "Poll {}/{} for prediction {} failed: {}",
                        attempt,
                        self.poll.max_attempts,
                        id,
                        e
                    );
                    continue;
                }
            };

            match current.status {
                PredictionStatus::Succeeded => {
                    return current.output_url().map(str::to_string).ok_or_else(|| {
                        AppError::ImageGeneration(format!("prediction {id} has no output"))
                    });
                }
                PredictionStatus::Failed | PredictionStatus::Canceled => {
                    return Err(AppError::ImageGeneration(format!(
                        "prediction {id} ended as {:?}: {}",
                        current.status,
                        current.error.map(|e| e.to_string()).unwrap_or_default()
                    )));
                }
                _ => {
                    tracing::debug!("Prediction {} still running (poll {})", id, attempt);
                }
            }
        }

        Err(AppError::ImageGeneration(format!(
            "prediction {id} did not finish after {} polls",
            self.poll.max_attempts
        )))
    }
}

#[async_trait]
impl ImageProvider for ReplicateClient {
    fn name(&self) -> &'static str {
        "replicate"
    }

    async fn generate_caricature(&self, subject: &RoastSubject) -> Result<GeneratedImage, AppError> {
        let prediction = self.submit(subject).await?;
        let url = self.wait_for_output(prediction).await?;
        download_image(&self.http_client, &url).await
    }
}
