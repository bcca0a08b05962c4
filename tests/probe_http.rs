//! HttpProber tests against a mock inference backend.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use availability_probe::config::{EndpointConfig, Service};
use availability_probe::health::{HttpProber, Prober, SubStatus, Tristate};
use chrono::Utc;

mod common;

use common::{CapturedRequest, MockResponse};

const TIMEOUT: Duration = Duration::from_secs(5);

fn endpoint(service: Service, addr: std::net::SocketAddr) -> EndpointConfig {
    EndpointConfig::new(service, "mock", format!("http://{}/", addr))
}

#[tokio::test]
async fn test_claude_probe_available() {
    let captured = Arc::new(Mutex::new(None::<CapturedRequest>));
    let sink = captured.clone();
    let addr = common::start_programmable_backend(move |request| {
        let sink = sink.clone();
        async move {
            *sink.lock().unwrap() = Some(request);
            MockResponse::new(200, r#"{"content":[{"type":"text","text":"pong"}]}"#)
        }
    })
    .await;

    let mut target = endpoint(Service::Claude, addr);
    target.auth_token = Some("secret-token".into());
    target.expected_substring = Some("pong".into());

    let prober = HttpProber::new().unwrap();
    let result = prober.probe(&target, TIMEOUT).await;

    assert_eq!(result.tristate, Tristate::Available);
    assert_eq!(result.sub_status, SubStatus::None);
    assert_eq!(result.http_status_code, Some(200));
    assert!(result.latency_ms.is_some());
    assert!(result.error_message.is_none());

    let request = captured.lock().unwrap().clone().unwrap();
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/v1/messages");
    assert_eq!(request.header("x-api-key"), Some("secret-token"));
    assert_eq!(request.header("anthropic-version"), Some("2023-06-01"));

    let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(body["model"], "claude-3-haiku-20240307");
    assert_eq!(body["messages"][0]["role"], "user");
    assert_eq!(body["messages"][0]["content"], "hi");
    assert_eq!(body["max_tokens"], 1);
}

#[tokio::test]
async fn test_codex_probe_with_sse_body() {
    let captured = Arc::new(Mutex::new(None::<CapturedRequest>));
    let sink = captured.clone();
    let addr = common::start_programmable_backend(move |request| {
        let sink = sink.clone();
        async move {
            *sink.lock().unwrap() = Some(request);
            MockResponse::new(
                200,
                "event: chunk\n\
data: {\"choices\":[{\"delta\":{\"content\":\"foo\"}}]}\n\
data: {\"choices\":[{\"delta\":{\"content\":\"bar\"}}]}\n\
data: [DONE]\n",
            )
        }
    })
    .await;

    let mut target = endpoint(Service::Codex, addr);
    target.api_key = Some("sk-test".into());
    target.expected_substring = Some("foobar".into());

    let result = HttpProber::new().unwrap().probe(&target, TIMEOUT).await;

    assert_eq!(result.tristate, Tristate::Available);
    let request = captured.lock().unwrap().clone().unwrap();
    assert_eq!(request.path, "/v1/chat/completions");
    assert_eq!(request.header("authorization"), Some("Bearer sk-test"));
}

#[tokio::test]
async fn test_auth_error() {
    let addr = common::start_mock_backend(MockResponse::new(401, r#"{"error":"bad key"}"#)).await;

    let result = HttpProber::new()
        .unwrap()
        .probe(&endpoint(Service::Claude, addr), TIMEOUT)
        .await;

    assert_eq!(result.tristate, Tristate::Unavailable);
    assert_eq!(result.sub_status, SubStatus::AuthError);
    assert_eq!(result.http_status_code, Some(401));
    assert_eq!(
        result.error_message.as_deref(),
        Some("authentication failed (401/403)")
    );
}

#[tokio::test]
async fn test_rate_limit_skips_content_check() {
    let addr = common::start_mock_backend(MockResponse::new(429, "slow down")).await;

    let mut target = endpoint(Service::Codex, addr);
    target.expected_substring = Some("pong".into());

    let result = HttpProber::new().unwrap().probe(&target, TIMEOUT).await;
    assert_eq!(result.sub_status, SubStatus::RateLimit);
}

#[tokio::test]
async fn test_content_mismatch() {
    let addr = common::start_mock_backend(MockResponse::new(
        200,
        r#"{"choices":[{"message":{"content":"hello world"}}]}"#,
    ))
    .await;

    let mut target = endpoint(Service::Codex, addr);
    target.expected_substring = Some("goodbye".into());

    let result = HttpProber::new().unwrap().probe(&target, TIMEOUT).await;
    assert_eq!(result.tristate, Tristate::Unavailable);
    assert_eq!(result.sub_status, SubStatus::ContentMismatch);
    assert_eq!(result.http_status_code, Some(200));
}

#[tokio::test]
async fn test_redirect_not_followed() {
    let addr = common::start_mock_backend(MockResponse::new(302, "")).await;

    let result = HttpProber::new()
        .unwrap()
        .probe(&endpoint(Service::Codex, addr), TIMEOUT)
        .await;
    assert_eq!(result.tristate, Tristate::Available);
    assert_eq!(result.http_status_code, Some(302));
}

#[tokio::test]
async fn test_slow_response_degraded() {
    let addr = common::start_mock_backend(
        MockResponse::new(200, "{}").delayed(Duration::from_millis(300)),
    )
    .await;

    let mut target = endpoint(Service::Claude, addr);
    target.slow_threshold_ms = 100;

    let result = HttpProber::new().unwrap().probe(&target, TIMEOUT).await;
    assert_eq!(result.tristate, Tristate::Degraded);
    assert_eq!(result.sub_status, SubStatus::SlowLatency);
    assert!(result.latency_ms.unwrap() >= 300);
    assert_eq!(result.error_message.as_deref(), Some("slow response"));
}

#[tokio::test]
async fn test_timeout_is_network_error() {
    let addr = common::start_mock_backend(
        MockResponse::new(200, "{}").delayed(Duration::from_secs(3)),
    )
    .await;

    let prober = HttpProber::new().unwrap();
    let target = endpoint(Service::Codex, addr);

    let before = Utc::now();
    let result = prober.probe(&target, Duration::from_millis(200)).await;

    assert_eq!(result.tristate, Tristate::Unavailable);
    assert_eq!(result.sub_status, SubStatus::NetworkError);
    assert_eq!(result.error_message.as_deref(), Some("request timed out"));
    assert!(result.http_status_code.is_none());
    assert!(result.latency_ms.is_none());
    assert!(result.checked_at >= before);
    assert!(result.checked_at <= before + chrono::Duration::milliseconds(150));
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let addr = common::unused_addr().await;

    let result = HttpProber::new()
        .unwrap()
        .probe(&endpoint(Service::Claude, addr), TIMEOUT)
        .await;

    assert_eq!(result.tristate, Tristate::Unavailable);
    assert_eq!(result.sub_status, SubStatus::NetworkError);
    assert!(result.http_status_code.is_none());
    assert!(result.latency_ms.is_none());

    let message = result.error_message.unwrap_or_default();
    assert!(message.starts_with("connection failed: "), "{message}");
}

#[tokio::test]
async fn test_closed_connection_is_network_error() {
    let addr = common::start_closing_backend().await;

    let result = HttpProber::new()
        .unwrap()
        .probe(&endpoint(Service::Codex, addr), TIMEOUT)
        .await;

    assert_eq!(result.tristate, Tristate::Unavailable);
    assert_eq!(result.sub_status, SubStatus::NetworkError);
    assert!(result.http_status_code.is_none());
    assert!(result.latency_ms.is_none());

    let message = result.error_message.unwrap_or_default();
    assert!(message.starts_with("network error: "), "{message}");
}
