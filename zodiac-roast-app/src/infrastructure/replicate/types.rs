use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct CreatePredictionRequest {
    pub version: String,
    pub input: PredictionInput,
}

#[derive(Debug, Serialize)]
pub struct PredictionInput {
    pub prompt: String,
    pub negative_prompt: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Prediction {
    pub id: String,
    pub status: PredictionStatus,
    #[serde(default)]
    pub output: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionStatus {
    Starting,
    Processing,
    Succeeded,
    Failed,
    Canceled,
    #[serde(other)]
    Unknown,
}

impl Prediction {
    /// Image models return either a list of URLs or a single URL.
    pub fn output_url(&self) -> Option<&str> {
        match self.output.as_ref()? {
            serde_json::Value::String(url) => Some(url.as_str()),
            serde_json::Value::Array(items) => items.iter().find_map(|v| v.as_str()),
            _ => None,
        }
    }
}
