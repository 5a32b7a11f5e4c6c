use zodiac_roast_app::{AppConfig, AppContext};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let (app_context, worker_pool) = match AppContext::from_config(&config).await {
        Ok(started) => started,
        Err(e) => {
            tracing::error!("Failed to start roast workflow: {}", e);
            std::process::exit(1);
        }
    };

    let app = zodiac_roast_api::router(app_context, &config.image_dir);

    tracing::info!("Listening on http://{}", config.bind_addr);
    tracing::info!("Caricatures served from {}", config.image_dir.display());

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // Queued roasts still get their content and image before exit.
    worker_pool.shutdown().await;
    tracing::info!("Shutdown complete");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Ctrl-C received, stopping the server");
}
