use http::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use std::time::Duration;

use crate::config::{ConfigError, UpstreamConfig};

/// Builds the shared upstream client with pooling, a finite request timeout and
/// the credential headers baked in.
pub fn build_client(config: &UpstreamConfig) -> Result<reqwest::Client, ConfigError> {
    let mut headers = HeaderMap::with_capacity(3);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let mut api_key =
        HeaderValue::from_str(&config.api_key).map_err(|_| ConfigError::InvalidHeader("ANTHROPIC_API_KEY"))?;
    api_key.set_sensitive(true);
    headers.insert(HeaderName::from_static("x-api-key"), api_key);

    headers.insert(
        HeaderName::from_static("anthropic-version"),
        HeaderValue::from_str(&config.api_version)
            .map_err(|_| ConfigError::InvalidHeader("ANTHROPIC_VERSION"))?,
    );

    let client = reqwest::Client::builder()
        .default_headers(headers)
        .pool_idle_timeout(Duration::from_secs(30))
        .pool_max_idle_per_host(32)
        .tcp_keepalive(Duration::from_secs(60))
        .timeout(config.timeout)
        .build()?;

    Ok(client)
}
