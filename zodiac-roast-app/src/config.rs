use crate::application::RetryPolicy;
use crate::infrastructure::openai::{DEFAULT_IMAGE_MODEL, DEFAULT_OPENAI_BASE_URL, DEFAULT_TEXT_MODEL};
use crate::infrastructure::replicate::DEFAULT_REPLICATE_MODEL_VERSION;
use std::net::SocketAddr;
use std::path::PathBuf;
use url::Url;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_IMAGE_DIR: &str = "data/images";
const DEFAULT_WORKER_COUNT: usize = 4;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Vendor credentials and models. Absent keys disable the matching feature.
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub text_model: String,
    pub image_model: String,
    pub replicate_api_key: Option<String>,
    pub replicate_model_version: String,
    pub retry: RetryPolicy,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            replicate_api_key: None,
            replicate_model_version: DEFAULT_REPLICATE_MODEL_VERSION.to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub public_base_url: Url,
    pub image_dir: PathBuf,
    pub worker_count: usize,
    pub ai: AiConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let bind_addr: SocketAddr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                name: "BIND_ADDR",
                reason: e.to_string(),
            })?;

        let public_base_url = Url::parse(
            &get("PUBLIC_BASE_URL").unwrap_or_else(|| format!("http://{bind_addr}")),
        )
        .map_err(|e| ConfigError::Invalid {
            name: "PUBLIC_BASE_URL",
            reason: e.to_string(),
        })?;

        let worker_count = match get("WORKER_COUNT") {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| ConfigError::Invalid {
                    name: "WORKER_COUNT",
                    reason: format!("expected a positive integer, got {raw:?}"),
                })?,
            None => DEFAULT_WORKER_COUNT,
        };

        let defaults = AiConfig::default();
        let ai = AiConfig {
            openai_api_key: get("OPENAI_API_KEY"),
            openai_base_url: get("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            text_model: get("TEXT_MODEL").unwrap_or(defaults.text_model),
            image_model: get("IMAGE_MODEL").unwrap_or(defaults.image_model),
            replicate_api_key: get("REPLICATE_API_KEY"),
            replicate_model_version: get("REPLICATE_MODEL_VERSION")
                .unwrap_or(defaults.replicate_model_version),
            retry: defaults.retry,
        };

        Ok(Self {
            database_url,
            bind_addr,
            public_base_url,
            image_dir: get("IMAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_IMAGE_DIR)),
            worker_count,
            ai,
        })
    }
}
