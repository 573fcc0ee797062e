use std::time::Instant;
use tracing::{error, info};

use crate::{
    error::AppError,
    providers::{CompletionBody, Provider},
    request::MessageParams,
};

mod client;
pub use client::build_client;

/// Sends one completion to the provider. Every failure collapses into
/// [`AppError::Provider`]; nothing is retried.
pub async fn relay_completion(
    provider: &dyn Provider,
    params: MessageParams,
) -> Result<CompletionBody, AppError> {
    let start = Instant::now();
    info!(
        provider = provider.name(),
        model = %params.model,
        max_tokens = params.max_tokens,
        "Relaying completion request"
    );

    match provider.create_message(&params).await {
        Ok(response) => {
            info!(
                provider = provider.name(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                bytes = response.as_bytes().len(),
                "Upstream completion succeeded"
            );
            Ok(response)
        }
        Err(e) => {
            error!(
                provider = provider.name(),
                status = ?e.status(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Upstream completion failed: {}",
                e
            );
            Err(AppError::Provider(e))
        }
    }
}
