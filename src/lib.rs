//! HTTP relay for the Anthropic Messages API.
//!
//! Callers post `{ model?, max_tokens?, messages }` to `/api/anthropic`; the relay
//! fills in defaults, forwards the triple with a server-side API key and returns
//! the upstream JSON unchanged. Any upstream failure becomes
//! `500 {"error": "<message>"}`.

use axum::{
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

pub mod config;
pub mod error;
pub mod handlers;
pub mod providers;
pub mod proxy;
pub mod request;
pub mod state;

pub use crate::{
    config::{AppConfig, ConfigError, RequestDefaults, UpstreamConfig},
    error::AppError,
    providers::{AnthropicProvider, CompletionBody, Provider, ProviderError},
    request::{CompletionRequest, MessageParams},
    state::AppState,
};

/// Builds the full router: relay routes, JSON 404 fallback and permissive CORS.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/anthropic", post(handlers::anthropic_relay))
        .route("/ask", post(handlers::ask))
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(cors)
}
