//! Endpoint health state and check results.
//!
//! # States
//! - Available: endpoint answered in time with acceptable content
//! - Degraded: endpoint answered successfully but slowly
//! - Unavailable: anything else (error status, bad content, no response)
//!
//! # Design Decisions
//! - Tri-state is ordered worst → best so results can be compared
//! - `error_message` is derived from the (tristate, sub-status) pair,
//!   never set independently, so the Available ⇔ None invariant holds
//! - A sub-status records why an endpoint is not Available

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{EndpointConfig, Service};

/// Coarse health classification, ordered worst → best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tristate {
    Unavailable,
    Degraded,
    Available,
}

impl Tristate {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tristate::Unavailable => "unavailable",
            Tristate::Degraded => "degraded",
            Tristate::Available => "available",
        }
    }
}

impl fmt::Display for Tristate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fine-grained reason refining a [`Tristate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubStatus {
    None,
    SlowLatency,
    RateLimit,
    AuthError,
    InvalidRequest,
    ServerError,
    ContentMismatch,
    NetworkError,
    ClientError,
}

impl SubStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubStatus::None => "none",
            SubStatus::SlowLatency => "slow_latency",
            SubStatus::RateLimit => "rate_limit",
            SubStatus::AuthError => "auth_error",
            SubStatus::InvalidRequest => "invalid_request",
            SubStatus::ServerError => "server_error",
            SubStatus::ContentMismatch => "content_mismatch",
            SubStatus::NetworkError => "network_error",
            SubStatus::ClientError => "client_error",
        }
    }

    /// Human-readable explanation used as the result's error message.
    pub fn describe(&self) -> &'static str {
        match self {
            SubStatus::None => "ok",
            SubStatus::SlowLatency => "slow response",
            SubStatus::RateLimit => "rate limited (429)",
            SubStatus::AuthError => "authentication failed (401/403)",
            SubStatus::InvalidRequest => "invalid request (400)",
            SubStatus::ServerError => "server error (5xx)",
            SubStatus::ContentMismatch => "response content mismatch",
            SubStatus::NetworkError => "network connection failed",
            SubStatus::ClientError => "client error (4xx)",
        }
    }
}

impl fmt::Display for SubStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one probe against one endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CheckResult {
    pub service: Service,
    pub name: String,
    pub tristate: Tristate,
    pub sub_status: SubStatus,
    pub http_status_code: Option<u16>,
    pub latency_ms: Option<u64>,
    pub error_message: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl CheckResult {
    /// Result for an endpoint that answered with an HTTP response.
    pub fn from_response(
        endpoint: &EndpointConfig,
        checked_at: DateTime<Utc>,
        status_code: u16,
        latency_ms: u64,
        (tristate, sub_status): (Tristate, SubStatus),
    ) -> Self {
        let error_message = match tristate {
            Tristate::Available => None,
            _ => Some(sub_status.describe().to_string()),
        };

        Self {
            service: endpoint.service,
            name: endpoint.name.clone(),
            tristate,
            sub_status,
            http_status_code: Some(status_code),
            latency_ms: Some(latency_ms),
            error_message,
            checked_at,
        }
    }

    /// Result for a probe that never received a response.
    pub fn network_failure(
        service: Service,
        name: impl Into<String>,
        checked_at: DateTime<Utc>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            service,
            name: name.into(),
            tristate: Tristate::Unavailable,
            sub_status: SubStatus::NetworkError,
            http_status_code: None,
            latency_ms: None,
            error_message: Some(message.into()),
            checked_at,
        }
    }

    pub fn is_available(&self) -> bool {
        self.tristate == Tristate::Available
    }
}
