use anthropic_relay::{MessageParams, RequestDefaults};
use http::StatusCode;
use serde_json::{json, Value};

use super::common::{
    post_json, raw, sample_message, spawn_relay, spawn_relay_with_defaults, FakeProvider,
};

#[test_log::test(tokio::test)]
async fn test_relay_fills_defaults() {
    let provider = FakeProvider::replying(sample_message());
    let base_url = spawn_relay(provider.clone()).await;

    let (status, _) = post_json(
        &format!("{}/api/anthropic", base_url),
        &json!({"messages": [{"role": "user", "content": "hi"}]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        provider.calls(),
        vec![MessageParams {
            model: "claude-sonnet-4-5-20250929".to_string(),
            max_tokens: 1200,
            messages: raw(json!([{"role": "user", "content": "hi"}])),
        }]
    );
}

#[tokio::test]
async fn test_relay_keeps_explicit_values() {
    let provider = FakeProvider::replying(sample_message());
    let base_url = spawn_relay(provider.clone()).await;

    let (status, _) = post_json(
        &format!("{}/api/anthropic", base_url),
        &json!({"model": "x", "max_tokens": 5, "messages": []}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        provider.calls(),
        vec![MessageParams {
            model: "x".to_string(),
            max_tokens: 5,
            messages: raw(json!([])),
        }]
    );
}

#[tokio::test]
async fn test_relay_uses_configured_defaults() {
    let provider = FakeProvider::replying(sample_message());
    let defaults = RequestDefaults {
        model: "claude-haiku-4-5".to_string(),
        max_tokens: 256,
    };
    let base_url = spawn_relay_with_defaults(provider.clone(), defaults).await;

    post_json(
        &format!("{}/api/anthropic", base_url),
        &json!({"max_tokens": 10, "messages": []}),
    )
    .await;

    let calls = provider.calls();
    assert_eq!(calls[0].model, "claude-haiku-4-5");
    assert_eq!(calls[0].max_tokens, 10);
}

#[tokio::test]
async fn test_relay_forwards_messages_unchanged() {
    let provider = FakeProvider::replying(sample_message());
    let base_url = spawn_relay(provider.clone()).await;

    let messages = json!([
        {"role": "user", "content": "What is 2 + 2?"},
        {"role": "assistant", "content": [{"type": "text", "text": "4"}]},
        {"role": "user", "content": [
            {"type": "text", "text": "And times 3?"},
            {"type": "image", "source": {"type": "base64", "media_type": "image/png", "data": "AAAA"}}
        ]}
    ]);

    post_json(
        &format!("{}/api/anthropic", base_url),
        &json!({"messages": messages.clone(), "temperature": 0.7}),
    )
    .await;

    assert_eq!(provider.calls()[0].messages.get(), raw(messages).get());
}

#[tokio::test]
async fn test_relay_returns_upstream_body_verbatim() {
    let upstream = sample_message();
    let provider = FakeProvider::replying(upstream.clone());
    let base_url = spawn_relay(provider).await;

    let (status, body) = post_json(
        &format!("{}/api/anthropic", base_url),
        &json!({"messages": [{"role": "user", "content": "hi"}]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, upstream);
}

#[tokio::test]
async fn test_relay_preserves_upstream_text_exactly() {
    let upstream = r#"{"id":"msg_1","type":"message","content":[{"type":"text","text":"hi"}],"usage":{"output_tokens":1,"input_tokens":2},"big":123456789012345678901234567890}"#;
    let provider = FakeProvider::replying_raw(upstream);
    let base_url = spawn_relay(provider).await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/anthropic", base_url))
        .json(&json!({"messages": []}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("application/json")
    );
    assert_eq!(response.text().await.unwrap(), upstream);
}

#[tokio::test]
async fn test_relay_preserves_inbound_messages_text_exactly() {
    let provider = FakeProvider::replying(sample_message());
    let base_url = spawn_relay(provider.clone()).await;

    let messages = r#"[{"role":"assistant","content":[{"type":"tool_use","id":"toolu_1","name":"lookup","input":{"zeta":1,"alpha":123456789012345678901234567890}}]}]"#;
    let response = reqwest::Client::new()
        .post(format!("{}/api/anthropic", base_url))
        .header("content-type", "application/json")
        .body(format!(r#"{{"messages":{}}}"#, messages))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(provider.calls()[0].messages.get(), messages);
}

#[test_log::test(tokio::test)]
async fn test_relay_reports_upstream_failure() {
    let provider = FakeProvider::failing(StatusCode::TOO_MANY_REQUESTS, "rate limited");
    let base_url = spawn_relay(provider.clone()).await;

    let (status, body) = post_json(
        &format!("{}/api/anthropic", base_url),
        &json!({"messages": [{"role": "user", "content": "hi"}]}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "rate limited"}));
    assert_eq!(body.as_object().map(|o| o.len()), Some(1));
    assert_eq!(provider.calls().len(), 1);
}

#[tokio::test]
async fn test_malformed_json_never_reaches_provider() {
    let provider = FakeProvider::replying(sample_message());
    let base_url = spawn_relay(provider.clone()).await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/anthropic", base_url))
        .header("content-type", "application/json")
        .body(r#"{"messages": [{"role": "user""#)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn test_missing_messages_is_rejected_before_forwarding() {
    let provider = FakeProvider::replying(sample_message());
    let base_url = spawn_relay(provider.clone()).await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/anthropic", base_url))
        .json(&json!({"model": "x"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn test_missing_content_type_is_rejected_before_forwarding() {
    let provider = FakeProvider::replying(sample_message());
    let base_url = spawn_relay(provider.clone()).await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/anthropic", base_url))
        .body(r#"{"messages":[]}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn test_wrong_content_type_is_rejected_before_forwarding() {
    let provider = FakeProvider::replying(sample_message());
    let base_url = spawn_relay(provider.clone()).await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/anthropic", base_url))
        .header("content-type", "text/plain")
        .body(r#"{"messages":[]}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn test_mistyped_max_tokens_is_rejected_before_forwarding() {
    let provider = FakeProvider::replying(sample_message());
    let base_url = spawn_relay(provider.clone()).await;
    let client = reqwest::Client::new();

    for max_tokens in [json!("5"), json!(-1)] {
        let response = client
            .post(format!("{}/api/anthropic", base_url))
            .json(&json!({"max_tokens": max_tokens, "messages": []}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
    assert!(provider.calls().is_empty());
}

#[tokio::test]
async fn test_relay_allows_any_origin() {
    let provider = FakeProvider::replying(sample_message());
    let base_url = spawn_relay(provider).await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/anthropic", base_url))
        .header("origin", "https://example.org")
        .json(&json!({"messages": []}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn test_concurrent_requests_are_independent() {
    let provider = FakeProvider::replying(sample_message());
    let base_url = spawn_relay(provider.clone()).await;
    let url = format!("{}/api/anthropic", base_url);

    let requests = (0..8).map(|i| {
        let url = url.clone();
        async move {
            post_json(&url, &json!({"max_tokens": i + 1, "messages": [{"role": "user", "content": i.to_string()}]}))
                .await
        }
    });
    let results = spawn_all(requests).await;

    assert!(results.iter().all(|(status, _)| *status == StatusCode::OK));

    let mut seen: Vec<u32> = provider.calls().iter().map(|c| c.max_tokens).collect();
    seen.sort_unstable();
    assert_eq!(seen, (1..=8).collect::<Vec<u32>>());
}

async fn spawn_all<F>(futures: impl Iterator<Item = F>) -> Vec<(StatusCode, Value)>
where
    F: std::future::Future<Output = (StatusCode, Value)> + Send + 'static,
{
    let handles: Vec<_> = futures.map(tokio::spawn).collect();
    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.await.expect("Request task panicked"));
    }
    results
}
