use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::{
    error::AppError,
    providers::{utils::joined_text, CompletionBody},
    proxy::relay_completion,
    request::{AskRequest, CompletionRequest},
    state::AppState,
};

pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// `POST /api/anthropic`: default-fill the request and return the upstream bytes as-is.
pub async fn anthropic_relay(
    State(state): State<AppState>,
    Json(request): Json<CompletionRequest>,
) -> Result<CompletionBody, AppError> {
    let params = request.into_params(&state.defaults);
    relay_completion(state.provider.as_ref(), params).await
}

/// `POST /ask`: one question in, the joined reply text out.
pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<Value>, AppError> {
    let params = request.into_params(&state.defaults)?;
    let response = relay_completion(state.provider.as_ref(), params).await?;
    Ok(Json(json!({ "response": joined_text(&response.to_value()?) })))
}

pub async fn not_found() -> AppError {
    AppError::NotFound
}
