pub mod rest;
pub mod state;

pub use rest::{
    create_book_handler, create_event_handler, delete_book_handler, list_books_handler,
    list_events_handler, stats_handler,
};

use crate::error::ApiError;
use axum::http::{header::{ACCEPT, CONTENT_TYPE}, HeaderValue, Method};
use axum::{routing::{delete, get}, Router};
use state::AppState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Builds the API router with CORS opened to the configured client origin.
pub fn router(app_state: Arc<AppState>) -> Result<Router, ApiError> {
    let origin = app_state
        .config
        .allowed_origin
        .parse::<HeaderValue>()
        .map_err(|e| ApiError::Internal(format!("Invalid ALLOWED_ORIGIN: {}", e)))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    Ok(Router::new()
        .route("/books", get(list_books_handler).post(create_book_handler))
        .route("/books/{id}", delete(delete_book_handler))
        .route("/events", get(list_events_handler).post(create_event_handler))
        .route("/stats", get(stats_handler))
        .layer(cors)
        .with_state(app_state))
}
