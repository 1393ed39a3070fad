//! Insulator Condition Classification Service
//!
//! HTTP service that classifies uploaded insulator images as cracked or
//! intact, persisting every prediction to MongoDB.

use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use izolator::api::rest::{create_router, AppState};
use izolator::config::Config;
use izolator::engine::OpenVinoClassifier;
use izolator::service::PredictService;
use izolator::storage::MongoStorage;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    info!(
        "Starting Insulator Classification Service v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Load configuration
    let config = Config::load(Config::default_path()).unwrap_or_else(|e| {
        info!("Using default config ({})", e);
        Config::default()
    });

    info!("Configuration loaded:");
    info!("  Port: {}", config.server.port);
    info!("  Model: {}", config.model.path.display());
    info!("  Device: {}", config.model.device);
    info!(
        "  Storage: {}/{}",
        config.storage.database, config.storage.collection
    );

    // Compile the frozen classifier; absence or corruption is fatal.
    let model_path = config.model.path.to_string_lossy();
    let classifier = Arc::new(OpenVinoClassifier::load(
        model_path.as_ref(),
        &config.model.device,
    )?);
    info!("Classifier compiled from {}", model_path);

    // Connect the document store; unreachability at boot is fatal.
    let storage = Arc::new(
        MongoStorage::connect(
            &config.storage.uri,
            &config.storage.database,
            &config.storage.collection,
        )
        .await?,
    );

    // Wire the orchestrator and HTTP surface
    let service = Arc::new(PredictService::new(classifier, storage));
    let state = Arc::new(AppState { service });
    let router = create_router(state, &config.server.allowed_origins);

    let addr = format!("0.0.0.0:{}", config.server.port);
    info!("REST API listening on http://{}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
