//! ONNX Model API server

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pinn_serve::{config::Config, pipeline::OnnxEngine, AppState, Pipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pinn_serve=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.json_logs() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("ONNX Model API v{} starting...", env!("CARGO_PKG_VERSION"));
    tracing::info!("Reference data: {}", config.reference_data_path.display());
    tracing::info!("Allowed origins: {}", config.allowed_origins.join(", "));

    // The model is loaded once; failure here aborts startup
    let engine = OnnxEngine::load(&config.model_path).map_err(|e| {
        tracing::error!("Error loading model: {}", e);
        e
    })?;

    let state = AppState {
        pipeline: Pipeline::new(Arc::new(engine), config.reference_data_path.clone()),
        config: config.clone(),
    };

    let app = pinn_serve::create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("🚀 Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
