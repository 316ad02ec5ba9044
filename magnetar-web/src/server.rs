//! JSON API server for Magnetar
//!
//! Wires the aggregation engine into an axum router and serves it.

use std::any::Any;
use std::sync::Arc;

use axum::Router;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use magnetar_core::{MagnetarConfig, MagnetarError, SearchConfig};
use magnetar_search::Aggregator;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::errors::ApiError;
use crate::handlers::{api_categories, api_ping, api_providers, api_search, root};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Search engine shared across requests
    pub aggregator: Arc<Aggregator>,
    /// Limit applied when the request has none
    pub default_limit: usize,
    /// Category applied when the request has none
    pub default_category: String,
}

impl AppState {
    /// Creates state around an aggregator with the search defaults from
    /// configuration.
    pub fn new(aggregator: Arc<Aggregator>, config: &SearchConfig) -> Self {
        Self {
            aggregator,
            default_limit: config.default_limit,
            default_category: config.default_category.clone(),
        }
    }
}

/// Builds the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/ping", get(api_ping))
        .route("/search", get(api_search))
        .route("/providers", get(api_providers))
        .route("/categories", get(api_categories))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Turns a handler panic into the regular 500 error body.
fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let reason = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "handler panicked".to_string()
    };

    ApiError::Internal { reason }.into_response()
}

/// Builds the engine from configuration and serves the API until Ctrl-C.
///
/// # Errors
/// - `MagnetarError::Configuration` - The engine could not be assembled
/// - `MagnetarError::Io` - The listener could not be bound
/// - `MagnetarError::Server` - The server stopped with an error
pub async fn run_server(config: MagnetarConfig) -> Result<(), MagnetarError> {
    let aggregator =
        Aggregator::from_config(&config).map_err(|e| MagnetarError::Configuration {
            reason: e.to_string(),
        })?;
    let state = AppState::new(Arc::new(aggregator), &config.search);
    let app = router(state);

    let address = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Magnetar gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(MagnetarError::from_server_error)?;

    tracing::info!("Magnetar gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
    }
}
