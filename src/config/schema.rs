//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the monitor.
//! All types derive Serde traits for deserialization from config files.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Root configuration for the availability monitor.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MonitorConfig {
    /// Probe tunables (timeout, fan-out).
    pub checker: CheckerConfig,

    /// Rolling history storage.
    pub history: HistoryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Monitored endpoint definitions.
    pub endpoints: Vec<EndpointConfig>,
}

/// Provider wire shape of a monitored endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    /// Anthropic Messages API (`/v1/messages`).
    Claude,
    /// OpenAI Chat Completions API (`/v1/chat/completions`).
    Codex,
}

impl Service {
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Claude => "claude",
            Service::Codex => "codex",
        }
    }

    /// Model used for the probe when the endpoint does not name one.
    pub fn default_model(&self) -> &'static str {
        match self {
            Service::Claude => "claude-3-haiku-20240307",
            Service::Codex => "gpt-3.5-turbo",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Service {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "claude" => Ok(Service::Claude),
            "codex" => Ok(Service::Codex),
            other => Err(format!("unknown service '{}' (expected claude or codex)", other)),
        }
    }
}

/// One monitored inference endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EndpointConfig {
    /// Wire shape used for the probe request.
    pub service: Service,

    /// Endpoint identifier, unique within its service.
    pub name: String,

    /// API base URL (e.g., "https://api.anthropic.com").
    pub base_url: String,

    #[serde(default)]
    pub auth_token: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    /// Whether the endpoint takes part in check cycles.
    #[serde(default = "default_enable_check")]
    pub enable_check: bool,

    /// Probe model; falls back to [`Service::default_model`].
    #[serde(default)]
    pub check_model: Option<String>,

    /// User message sent in the probe.
    #[serde(default = "default_check_message")]
    pub check_message: String,

    /// `max_tokens` sent in the probe.
    #[serde(default = "default_check_max_tokens")]
    pub check_max_tokens: u32,

    /// Text the response must contain for the endpoint to count as healthy.
    #[serde(default, alias = "success_contains")]
    pub expected_substring: Option<String>,

    /// Latency above which a successful response is downgraded.
    #[serde(default = "default_slow_threshold_ms", alias = "slow_latency_ms")]
    pub slow_threshold_ms: u64,
}

fn default_enable_check() -> bool {
    true
}

fn default_check_message() -> String {
    "hi".to_string()
}

fn default_check_max_tokens() -> u32 {
    1
}

fn default_slow_threshold_ms() -> u64 {
    5000
}

impl EndpointConfig {
    /// Create an endpoint with every optional field at its default.
    pub fn new(service: Service, name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            service,
            name: name.into(),
            base_url: base_url.into(),
            auth_token: None,
            api_key: None,
            enable_check: default_enable_check(),
            check_model: None,
            check_message: default_check_message(),
            check_max_tokens: default_check_max_tokens(),
            expected_substring: None,
            slow_threshold_ms: default_slow_threshold_ms(),
        }
    }

    /// Model to probe with, resolving empty or absent values to the service default.
    pub fn effective_model(&self) -> &str {
        match self.check_model.as_deref() {
            Some(model) if !model.is_empty() => model,
            _ => self.service.default_model(),
        }
    }

    /// Non-empty auth token, if any.
    pub fn auth_token(&self) -> Option<&str> {
        non_empty(self.auth_token.as_deref())
    }

    /// Non-empty API key, if any.
    pub fn api_key(&self) -> Option<&str> {
        non_empty(self.api_key.as_deref())
    }

    /// Non-empty expected substring, if any.
    pub fn expected_substring(&self) -> Option<&str> {
        non_empty(self.expected_substring.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Probe tunables passed into the monitor.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Per-probe timeout in seconds.
    pub timeout_secs: u64,

    /// Maximum number of probes in flight at once.
    pub max_concurrency: usize,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            max_concurrency: 5,
        }
    }
}

/// History storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Path of the JSON history file.
    pub path: String,

    /// Records kept per endpoint.
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: "data/site_availability.json".to_string(),
            max_entries: crate::history::DEFAULT_HISTORY_LIMIT,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
