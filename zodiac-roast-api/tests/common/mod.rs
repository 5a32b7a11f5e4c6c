#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;
use zodiac_roast_app::application::{RetryPolicy, WorkerPool};
use zodiac_roast_app::infrastructure::clock::ManualClock;
use zodiac_roast_app::infrastructure::db::{connect_in_memory, RoastRepository};
use zodiac_roast_app::testing::{MemoryBlobStore, ScriptedTextGenerator, StaticImageProvider};
use zodiac_roast_app::{AppContext, Services};

pub const T0: i64 = 1_700_000_000_000;
pub const HOUR: i64 = 60 * 60 * 1000;

pub struct TestApp {
    pub router: Router,
    pub pool: WorkerPool,
    pub clock: Arc<ManualClock>,
    pub image_dir: TempDir,
}

/// Full router over in-memory SQLite with scripted AI vendors.
pub async fn build_test_app() -> TestApp {
    let repo = RoastRepository::new(connect_in_memory().await.unwrap());
    let clock = Arc::new(ManualClock::new(T0));
    let (ctx, pool) = AppContext::start(
        Services {
            repo,
            clock: clock.clone(),
            text_generator: Some(Arc::new(ScriptedTextGenerator::always(
                "{name} reads horoscopes for the plot twists.",
            ))),
            image_provider: Some(Arc::new(StaticImageProvider::png())),
            blob_store: Arc::new(MemoryBlobStore::default()),
            retry: RetryPolicy {
                max_retries: 2,
                backoff: Duration::ZERO,
            },
        },
        2,
    );

    let image_dir = tempfile::tempdir().unwrap();
    TestApp {
        router: zodiac_roast_api::router(ctx, image_dir.path()),
        pool,
        clock,
        image_dir,
    }
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: &Router, uri: &str, body: &serde_json::Value) -> Response<Body> {
    post_raw(app, uri, body.to_string()).await
}

pub async fn post_raw(app: &Router, uri: &str, body: String) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn submission(name: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "birthdate": "1990-07-04",
        "hobbies": "crossfit, telling people about crossfit",
        "nationality": "Canadian",
    })
}
