use super::{CompletionBody, Provider, ProviderError};
use crate::config::{ConfigError, UpstreamConfig};
use crate::proxy::build_client;
use crate::request::MessageParams;
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error};

pub struct AnthropicProvider {
    client: reqwest::Client,
    messages_url: String,
}

impl AnthropicProvider {
    pub fn new(config: &UpstreamConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            client: build_client(config)?,
            messages_url: config.messages_url(),
        })
    }
}

#[async_trait]
impl Provider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn create_message(&self, params: &MessageParams) -> Result<CompletionBody, ProviderError> {
        debug!(url = %self.messages_url, model = %params.model, "Sending messages request");

        let response = self
            .client
            .post(&self.messages_url)
            .json(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, "Anthropic returned an error response");
            return Err(ProviderError::Api {
                status,
                message: error_message(&body)
                    .unwrap_or_else(|| fallback_message(&body, status)),
            });
        }

        CompletionBody::from_json_bytes(response.bytes().await?)
    }
}

/// Pulls `error.message` out of an Anthropic error envelope:
/// `{"type":"error","error":{"type":"rate_limit_error","message":"..."}}`
fn error_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    json.get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

fn fallback_message(body: &str, status: http::StatusCode) -> String {
    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| status.to_string())
    } else {
        body.to_string()
    }
}
