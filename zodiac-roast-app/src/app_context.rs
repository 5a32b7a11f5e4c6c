use crate::application::{
    BlobStore, CreateRoast, GenerateContent, GenerateImage, ImageProvider, RetryPolicy,
    RoastJobRunner, RoastQueries, TextGenerator, WorkQueue, WorkerPool,
};
use crate::config::{AiConfig, AppConfig};
use crate::infrastructure::clock::{Clock, SystemClock};
use crate::infrastructure::db::{self, RoastRepository};
use crate::infrastructure::openai::OpenAiClient;
use crate::infrastructure::replicate::ReplicateClient;
use crate::infrastructure::storage::LocalBlobStore;
use std::sync::Arc;
use std::time::Duration;
use zodiac_roast_errors::AppError;

const VENDOR_TIMEOUT: Duration = Duration::from_secs(120);

/// Collaborators the roast workflow is assembled from.
pub struct Services {
    pub repo: RoastRepository,
    pub clock: Arc<dyn Clock>,
    pub text_generator: Option<Arc<dyn TextGenerator>>,
    pub image_provider: Option<Arc<dyn ImageProvider>>,
    pub blob_store: Arc<dyn BlobStore>,
    pub retry: RetryPolicy,
}

#[derive(Clone)]
pub struct AppContext {
    pub create_roast: Arc<CreateRoast>,
    pub queries: Arc<RoastQueries>,
}

impl AppContext {
    /// Wires the workflow and starts its worker pool.
    pub fn start(services: Services, worker_count: usize) -> (Self, WorkerPool) {
        let (queue, receiver) = WorkQueue::new();
        let rate_limiter = crate::infrastructure::security::RateLimiter::new(services.repo.clone());

        let runner = RoastJobRunner::new(
            GenerateContent::new(
                services.repo.clone(),
                services.text_generator,
                services.retry,
            ),
            GenerateImage::new(
                services.repo.clone(),
                services.image_provider,
                services.blob_store,
            ),
        );
        let pool = WorkerPool::spawn(Arc::new(runner), queue.clone(), receiver, worker_count);

        let context = Self {
            create_roast: Arc::new(CreateRoast::new(
                services.repo.clone(),
                rate_limiter.clone(),
                Arc::clone(&services.clock),
                queue,
            )),
            queries: Arc::new(RoastQueries::new(
                services.repo,
                rate_limiter,
                services.clock,
            )),
        };

        (context, pool)
    }

    pub async fn from_config(config: &AppConfig) -> Result<(Self, WorkerPool), AppError> {
        let connection = db::create_connection(&config.database_url)
            .await
            .map_err(db::db_error)?;
        db::run_migrations(&connection).await.map_err(db::db_error)?;

        let http_client = reqwest::Client::builder()
            .timeout(VENDOR_TIMEOUT)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {e}")))?;

        let services = Services {
            repo: RoastRepository::new(connection),
            clock: Arc::new(SystemClock),
            text_generator: text_generator(&config.ai, &http_client),
            image_provider: image_provider(&config.ai, &http_client),
            blob_store: Arc::new(LocalBlobStore::new(
                config.image_dir.clone(),
                config.public_base_url.clone(),
            )),
            retry: config.ai.retry,
        };

        Ok(Self::start(services, config.worker_count))
    }
}

fn openai_client(ai: &AiConfig, http_client: &reqwest::Client) -> Option<OpenAiClient> {
    ai.openai_api_key.as_ref().map(|key| {
        OpenAiClient::new(http_client.clone(), key.clone())
            .with_base_url(ai.openai_base_url.clone())
            .with_text_model(ai.text_model.clone())
            .with_image_model(ai.image_model.clone())
    })
}

pub fn text_generator(
    ai: &AiConfig,
    http_client: &reqwest::Client,
) -> Option<Arc<dyn TextGenerator>> {
    match openai_client(ai, http_client) {
        Some(client) => {
            tracing::info!("Text generation: {} via {}", ai.text_model, ai.openai_base_url);
            Some(Arc::new(client))
        }
        None => {
            tracing::warn!("OPENAI_API_KEY not configured, roasts will use the fallback text");
            None
        }
    }
}

/// OpenAI images when its key is present, otherwise Replicate, otherwise none.
pub fn image_provider(
    ai: &AiConfig,
    http_client: &reqwest::Client,
) -> Option<Arc<dyn ImageProvider>> {
    if let Some(client) = openai_client(ai, http_client) {
        tracing::info!("Image generation: {} (OpenAI)", ai.image_model);
        return Some(Arc::new(client));
    }

    if let Some(key) = &ai.replicate_api_key {
        tracing::info!("Image generation: Replicate {}", ai.replicate_model_version);
        return Some(Arc::new(
            ReplicateClient::new(http_client.clone(), key.clone())
                .with_model_version(ai.replicate_model_version.clone()),
        ));
    }

    tracing::info!("No image provider configured, caricatures disabled");
    None
}
