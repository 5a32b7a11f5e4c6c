use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded { reset_at: Option<i64> },

    #[error("Text generation failed: {message}")]
    TextGeneration { message: String, retryable: bool },

    #[error("Image generation failed: {0}")]
    ImageGeneration(String),

    #[error("Blob storage failed: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Roast not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn text_generation(message: impl Into<String>) -> Self {
        Self::TextGeneration {
            message: message.into(),
            retryable: false,
        }
    }

    /// Network failures, throttling and upstream 5xx.
    pub fn transient_text_generation(message: impl Into<String>) -> Self {
        Self::TextGeneration {
            message: message.into(),
            retryable: true,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TextGeneration { retryable: true, .. })
    }

    pub fn user_message(&self) -> &str {
        match self {
            Self::Validation(_) => "Please fill in all fields correctly!",
            Self::RateLimitExceeded { .. } => {
                "Rate limit exceeded! Please try again in a few hours or run locally."
            }
            Self::TextGeneration { .. } => "The comedy AI is on a coffee break. Try again later.",
            Self::ImageGeneration(_) => "The caricature artist dropped their pencil.",
            Self::NotFound => "Roast not found.",
            Self::Storage(_) | Self::Database(_) | Self::Internal(_) => {
                "Something went wrong on our side. Please try again!"
            }
        }
    }
}

#[cfg(feature = "ssr")]
mod ssr_impl {
    use super::AppError;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::Json;

    #[derive(serde::Serialize)]
    #[serde(rename_all = "camelCase")]
    struct ErrorResponse {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        reset_at: Option<i64>,
    }

    impl AppError {
        pub fn status_code(&self) -> StatusCode {
            match self {
                AppError::Validation(_) => StatusCode::BAD_REQUEST,
                AppError::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
                AppError::TextGeneration { .. } | AppError::ImageGeneration(_) => {
                    StatusCode::BAD_GATEWAY
                }
                AppError::NotFound => StatusCode::NOT_FOUND,
                AppError::Storage(_) | AppError::Database(_) | AppError::Internal(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
        }
    }

    impl IntoResponse for AppError {
        fn into_response(self) -> Response {
            let status = self.status_code();
            let (message, reset_at) = match &self {
                AppError::Validation(msg) => (msg.clone(), None),
                AppError::RateLimitExceeded { reset_at } => {
                    ("RATE_LIMIT_EXCEEDED".to_string(), *reset_at)
                }
                AppError::NotFound => ("Not found".to_string(), None),
                // Internal details stay in the logs, not in the response body.
                other => (other.user_message().to_string(), None),
            };
            (status, Json(ErrorResponse { message, reset_at })).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_text_generation() {
        assert!(AppError::transient_text_generation("HTTP 503").is_retryable());
        assert!(!AppError::text_generation("HTTP 401").is_retryable());
        assert!(!AppError::NotFound.is_retryable());
    }

    #[test]
    fn test_rate_limit_serializes_reset_at() {
        let err = AppError::RateLimitExceeded {
            reset_at: Some(1_700_000_000_000),
        };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["RateLimitExceeded"]["reset_at"], 1_700_000_000_000i64);
    }

    #[cfg(feature = "ssr")]
    #[test]
    fn test_status_codes() {
        use axum::http::StatusCode;
        assert_eq!(
            AppError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::RateLimitExceeded { reset_at: None }.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(AppError::NotFound.status_code(), StatusCode::NOT_FOUND);
    }
}
