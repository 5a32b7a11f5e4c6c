use super::prompt::{build_roast_prompt, ROAST_SYSTEM_PROMPT};
use super::types::{ChatCompletionRequest, ChatCompletionResponse};
use crate::application::TextGenerator;
use crate::domain::RoastSubject;
use async_trait::async_trait;
use reqwest::StatusCode;
use zodiac_roast_errors::AppError;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TEXT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";
const ROAST_TEMPERATURE: f32 = 0.8;

/// Client for an OpenAI-compatible API: chat completions for roast text,
/// image generations for caricatures.
#[derive(Clone)]
pub struct OpenAiClient {
    pub(super) http_client: reqwest::Client,
    pub(super) api_key: String,
    pub(super) base_url: String,
    text_model: String,
    pub(super) image_model: String,
}

impl OpenAiClient {
    pub fn new(http_client: reqwest::Client, api_key: String) -> Self {
        Self {
            http_client,
            api_key,
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_text_model(mut self, model: impl Into<String>) -> Self {
        self.text_model = model.into();
        self
    }

    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = model.into();
        self
    }

    pub(super) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    async fn generate_roast(&self, subject: &RoastSubject) -> Result<String, AppError> {
        let prompt = build_roast_prompt(subject);
        let request = ChatCompletionRequest::new(
            &self.text_model,
            ROAST_SYSTEM_PROMPT,
            prompt,
            ROAST_TEMPERATURE,
        );

        let response = self
            .http_client
            .post(self.endpoint("chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::transient_text_generation(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Chat completion error: {} - {}", status, body);
            return Err(classify_status(status));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::text_generation(e.to_string()))?;

        completion
            .into_text()
            .ok_or_else(|| AppError::text_generation("No response from AI"))
    }
}

/// Throttling and upstream failures are worth another attempt; anything
/// else (bad key, bad request) will fail the same way again.
pub(crate) fn classify_status(status: StatusCode) -> AppError {
    let message = format!("API error: {status}");
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        AppError::transient_text_generation(message)
    } else {
        AppError::text_generation(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ZodiacSign;
    use crate::infrastructure::fake_vendor;
    use axum::http::HeaderMap;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    /// An OpenAI-compatible endpoint that always answers `status` + `body`
    /// and insists on the bearer key.
    async fn chat_server(status: StatusCode, body: Value) -> String {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(move |headers: HeaderMap| {
                let body = body.clone();
                async move {
                    let authorized = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        == Some("Bearer sk-test");
                    if authorized {
                        (status, Json(body))
                    } else {
                        (StatusCode::UNAUTHORIZED, Json(json!({ "error": "bad key" })))
                    }
                }
            }),
        );
        fake_vendor::serve(router).await
    }

    fn client(base: &str) -> OpenAiClient {
        OpenAiClient::new(reqwest::Client::new(), "sk-test".to_string())
            .with_base_url(format!("{base}/v1"))
    }

    fn subject() -> RoastSubject {
        RoastSubject {
            roast_id: uuid::Uuid::new_v4(),
            name: "Tomás".to_string(),
            hobbies: "fantasy football".to_string(),
            nationality: "Spanish".to_string(),
            zodiac_sign: ZodiacSign::Gemini,
        }
    }

    #[test]
    fn test_classify_status() {
        assert!(classify_status(StatusCode::TOO_MANY_REQUESTS).is_retryable());
        assert!(classify_status(StatusCode::BAD_GATEWAY).is_retryable());
        assert!(!classify_status(StatusCode::UNAUTHORIZED).is_retryable());
        assert!(!classify_status(StatusCode::BAD_REQUEST).is_retryable());
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = OpenAiClient::new(reqwest::Client::new(), "key".into())
            .with_base_url("http://localhost:8080/v1/");
        assert_eq!(
            client.endpoint("chat/completions"),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn test_generate_roast_returns_trimmed_text() {
        let base = chat_server(
            StatusCode::OK,
            json!({ "choices": [{ "message": { "content": "  Classic Gemini.  " } }] }),
        )
        .await;

        let text = client(&base).generate_roast(&subject()).await.unwrap();
        assert_eq!(text, "Classic Gemini.");
    }

    #[tokio::test]
    async fn test_generate_roast_classifies_http_failures() {
        let cases = [
            (StatusCode::TOO_MANY_REQUESTS, true),
            (StatusCode::SERVICE_UNAVAILABLE, true),
            (StatusCode::BAD_REQUEST, false),
        ];
        for (status, retryable) in cases {
            let base = chat_server(status, json!({ "error": "nope" })).await;
            let err = client(&base).generate_roast(&subject()).await.unwrap_err();
            assert!(matches!(err, AppError::TextGeneration { .. }));
            assert_eq!(err.is_retryable(), retryable, "{status}");
        }

        let base = chat_server(StatusCode::OK, json!({ "choices": [] })).await;
        let wrong_key = OpenAiClient::new(reqwest::Client::new(), "sk-other".to_string())
            .with_base_url(format!("{base}/v1"));
        let err = wrong_key.generate_roast(&subject()).await.unwrap_err();
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_empty_completion_is_not_retried() {
        let base = chat_server(StatusCode::OK, json!({ "choices": [] })).await;
        let err = client(&base).generate_roast(&subject()).await.unwrap_err();
        assert!(matches!(err, AppError::TextGeneration { retryable: false, .. }));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_retryable() {
        let client = OpenAiClient::new(reqwest::Client::new(), "sk-test".to_string())
            .with_base_url("http://127.0.0.1:1/v1");
        let err = client.generate_roast(&subject()).await.unwrap_err();
        assert!(err.is_retryable());
    }
}
