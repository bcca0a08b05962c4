//! Active endpoint probing.
//!
//! # Responsibilities
//! - Build the provider-shaped probe request for an endpoint
//! - Send it under a per-probe deadline and measure latency
//! - Classify responses, categorize transport failures
//!
//! # Design Decisions
//! - One attempt per probe, no retries
//! - Redirects are not followed; a 3xx is classified as-is
//! - Every failure becomes a CheckResult, nothing escapes as an error

use std::error::Error as StdError;
use std::future::Future;
use std::time::{Duration, Instant};

use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde_json::{json, Value};
use thiserror::Error;
use tokio::time;

use crate::config::{EndpointConfig, Service};
use crate::health::classify::{apply_content_check, classify_base};
use crate::health::state::{CheckResult, Tristate};
use crate::observability::metrics;

const USER_AGENT: &str = concat!("availability-probe/", env!("CARGO_PKG_VERSION"));
const ANTHROPIC_VERSION: &str = "2023-06-01";
const X_API_KEY: &str = "x-api-key";
const ANTHROPIC_VERSION_HEADER: &str = "anthropic-version";

/// Transport-level probe failure. Always folded into a [`CheckResult`].
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl From<reqwest::Error> for ProbeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProbeError::Timeout
        } else if e.is_connect() {
            ProbeError::Connect(error_chain(&e))
        } else if e.is_request() || e.is_body() || e.is_decode() || e.is_redirect() {
            ProbeError::Network(error_chain(&e))
        } else {
            ProbeError::Unexpected(error_chain(&e))
        }
    }
}

/// Render an error with its source chain, e.g. "error sending request: tcp connect error: refused".
fn error_chain(e: &dyn StdError) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

/// A fully built probe request, ready to send.
#[derive(Debug, Clone)]
pub struct ProbeRequest {
    pub url: String,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Build the provider-specific probe request for an endpoint.
pub fn build_probe_request(endpoint: &EndpointConfig) -> Result<ProbeRequest, ProbeError> {
    let base = endpoint.base_url.trim_end_matches('/');
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let url = match endpoint.service {
        Service::Claude => {
            headers.insert(
                HeaderName::from_static(ANTHROPIC_VERSION_HEADER),
                HeaderValue::from_static(ANTHROPIC_VERSION),
            );
            if let Some(credential) = endpoint.auth_token().or(endpoint.api_key()) {
                headers.insert(HeaderName::from_static(X_API_KEY), header_value(credential)?);
            }
            format!("{}/v1/messages", base)
        }
        Service::Codex => {
            if let Some(credential) = endpoint.api_key().or(endpoint.auth_token()) {
                headers.insert(AUTHORIZATION, header_value(&format!("Bearer {}", credential))?);
            }
            format!("{}/v1/chat/completions", base)
        }
    };

    let body = json!({
        "model": endpoint.effective_model(),
        "messages": [
            { "role": "user", "content": endpoint.check_message }
        ],
        "max_tokens": endpoint.check_max_tokens,
    });

    Ok(ProbeRequest { url, headers, body })
}

fn header_value(raw: &str) -> Result<HeaderValue, ProbeError> {
    let mut value = HeaderValue::from_str(raw)
        .map_err(|e| ProbeError::Unexpected(format!("invalid credential header: {}", e)))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Executes one probe against one endpoint.
///
/// Implementations must never fail: every outcome is a [`CheckResult`].
pub trait Prober: Send + Sync + 'static {
    fn probe(
        &self,
        endpoint: &EndpointConfig,
        timeout: Duration,
    ) -> impl Future<Output = CheckResult> + Send;
}

/// reqwest-backed prober speaking both provider wire shapes.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    /// Create a prober with its own HTTP client.
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self::with_client(client))
    }

    /// Create a prober on top of an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn send(&self, request: ProbeRequest) -> Result<(u16, Vec<u8>), ProbeError> {
        let response = self
            .client
            .post(&request.url)
            .headers(request.headers)
            .json(&request.body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?;
        Ok((status, body.to_vec()))
    }
}

impl Prober for HttpProber {
    async fn probe(&self, endpoint: &EndpointConfig, timeout: Duration) -> CheckResult {
        let checked_at = Utc::now();

        let outcome = match build_probe_request(endpoint) {
            Ok(request) => {
                tracing::debug!(
                    service = %endpoint.service,
                    name = %endpoint.name,
                    url = %request.url,
                    "Sending probe"
                );
                let start = Instant::now();
                match time::timeout(timeout, self.send(request)).await {
                    Ok(sent) => sent.map(|(status, body)| (status, body, elapsed_ms(start))),
                    Err(_) => Err(ProbeError::Timeout),
                }
            }
            Err(e) => Err(e),
        };

        let result = match outcome {
            Ok((status, body, latency_ms)) => {
                let (tristate, sub_status) = classify_base(status, latency_ms, endpoint.slow_threshold_ms);
                let classified =
                    apply_content_check(tristate, sub_status, &body, endpoint.expected_substring());
                CheckResult::from_response(endpoint, checked_at, status, latency_ms, classified)
            }
            Err(e) => CheckResult::network_failure(
                endpoint.service,
                endpoint.name.clone(),
                checked_at,
                e.to_string(),
            ),
        };

        log_result(&result);
        metrics::record_check(&result);
        result
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn log_result(result: &CheckResult) {
    match result.tristate {
        Tristate::Available => tracing::debug!(
            service = %result.service,
            name = %result.name,
            status_code = ?result.http_status_code,
            latency_ms = ?result.latency_ms,
            "Endpoint available"
        ),
        _ => tracing::warn!(
            service = %result.service,
            name = %result.name,
            tristate = %result.tristate,
            sub_status = %result.sub_status,
            status_code = ?result.http_status_code,
            latency_ms = ?result.latency_ms,
            error = result.error_message.as_deref().unwrap_or_default(),
            "Endpoint check failed"
        ),
    }
}
