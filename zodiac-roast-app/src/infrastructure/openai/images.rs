use super::client::OpenAiClient;
use super::prompt::build_caricature_prompt;
use super::types::{ImageGenerationRequest, ImageGenerationResponse};
use crate::application::ImageProvider;
use crate::domain::{GeneratedImage, RoastSubject};
use crate::infrastructure::storage::download_image;
use async_trait::async_trait;
use zodiac_roast_errors::AppError;

#[async_trait]
impl ImageProvider for OpenAiClient {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn generate_caricature(&self, subject: &RoastSubject) -> Result<GeneratedImage, AppError> {
        let request = ImageGenerationRequest::new(&self.image_model, build_caricature_prompt(subject));

        let response = self
            .http_client
            .post(self.endpoint("images/generations"))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::ImageGeneration(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Image generation error: {} - {}", status, body);
            return Err(AppError::ImageGeneration(format!("API error: {status}")));
        }

        let generated: ImageGenerationResponse = response
            .json()
            .await
            .map_err(|e| AppError::ImageGeneration(e.to_string()))?;

        let url = generated
            .data
            .into_iter()
            .find_map(|d| d.url)
            .ok_or_else(|| AppError::ImageGeneration("No image URL in response".to_string()))?;

        download_image(&self.http_client, &url).await
    }
}
