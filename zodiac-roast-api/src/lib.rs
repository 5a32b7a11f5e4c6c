//! HTTP surface of the zodiac roast service.

mod handlers;

use axum::routing::{get, post};
use axum::Router;
use std::path::Path;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use zodiac_roast_app::infrastructure::storage::IMAGE_ROUTE;
use zodiac_roast_app::AppContext;

/// Builds the application router. Caricatures written to `image_dir` are
/// served under `/images`.
pub fn router(ctx: AppContext, image_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/roasts",
            post(handlers::create_roast).get(handlers::list_roasts),
        )
        .route("/api/roasts/{id}", get(handlers::get_roast))
        .route("/api/rate-limit", get(handlers::rate_limit))
        .nest_service(IMAGE_ROUTE, ServeDir::new(image_dir.as_ref()))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
