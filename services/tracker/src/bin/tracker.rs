//! services/tracker/src/bin/tracker.rs

use std::sync::Arc;

use axum::Router;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tracker_lib::{
    adapters::{JsonFileStore, SystemClock},
    config::Config,
    error::ApiError,
    web::{rest::ApiDoc, router, state::AppState},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Open the Store ---
    let store = Arc::new(JsonFileStore::new(config.data_dir.clone()));
    store
        .ensure_dir()
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    // --- 3. Build the Shared AppState and Load Existing Data ---
    let app_state = Arc::new(AppState::new(config.clone(), store, Arc::new(SystemClock)));
    let initial = app_state.tracker.refresh().await;
    for e in &initial.load_errors {
        warn!("Starting with an empty collection: {}", e);
    }
    info!(
        "Loaded {} books and {} reading events.",
        initial.value.books().len(),
        initial.value.events().len()
    );
    app_state.tracker.verify().await;

    // --- 4. Create the Web Router ---
    let app = Router::new()
        .merge(router(app_state)?)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
