use async_trait::async_trait;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use http::{header::CONTENT_TYPE, HeaderValue, StatusCode};
use serde_json::{value::RawValue, Value};

use crate::request::MessageParams;

mod anthropic;
pub mod utils;

pub use anthropic::AnthropicProvider;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The upstream answered with a non-success status.
    #[error("{message}")]
    Api { status: StatusCode, message: String },

    #[error("Upstream returned invalid JSON: {0}")]
    InvalidBody(#[from] serde_json::Error),
}

impl ProviderError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ProviderError::Transport(e) => e.status(),
            ProviderError::Api { status, .. } => Some(*status),
            ProviderError::InvalidBody(_) => None,
        }
    }
}

/// A successful upstream reply, kept as the exact bytes the upstream sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionBody(Bytes);

impl CompletionBody {
    /// Accepts `bytes` only if they hold one well-formed JSON document.
    pub fn from_json_bytes(bytes: Bytes) -> Result<Self, ProviderError> {
        serde_json::from_slice::<&RawValue>(&bytes)?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_slice(&self.0)
    }
}

impl IntoResponse for CompletionBody {
    fn into_response(self) -> Response {
        (
            [(CONTENT_TYPE, HeaderValue::from_static("application/json"))],
            self.0,
        )
            .into_response()
    }
}

#[async_trait]
pub trait Provider: Send + Sync {
    /// Get the provider's name for logging and identification
    fn name(&self) -> &str;

    /// Create a message completion and return the upstream JSON untouched
    async fn create_message(&self, params: &MessageParams) -> Result<CompletionBody, ProviderError>;
}
