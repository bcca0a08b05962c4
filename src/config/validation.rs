//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check endpoint identity is unique per service
//! - Validate value ranges (timeouts > 0, concurrency > 0)
//! - Reject log levels the subscriber would not understand
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MonitorConfig → Result<(), Vec<ValidationError>>

use std::collections::HashSet;

use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::config::schema::{MonitorConfig, Service};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("endpoint #{index} of service {service} has an empty name")]
    EmptyName { service: Service, index: usize },

    #[error("duplicate endpoint {service}/{name}")]
    DuplicateEndpoint { service: Service, name: String },

    #[error("endpoint {service}/{name} has invalid base_url: {reason}")]
    InvalidBaseUrl {
        service: Service,
        name: String,
        reason: String,
    },

    #[error("checker.timeout_secs must be greater than 0")]
    ZeroTimeout,

    #[error("checker.max_concurrency must be greater than 0")]
    ZeroConcurrency,

    #[error("history.max_entries must be greater than 0")]
    ZeroHistoryLimit,

    #[error("observability.log_level '{0}' is not one of off, error, warn, info, debug, trace")]
    InvalidLogLevel(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &MonitorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.checker.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.checker.max_concurrency == 0 {
        errors.push(ValidationError::ZeroConcurrency);
    }
    if config.history.max_entries == 0 {
        errors.push(ValidationError::ZeroHistoryLimit);
    }
    if config.observability.log_level.parse::<LevelFilter>().is_err() {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    let mut seen = HashSet::new();
    for (index, endpoint) in config.endpoints.iter().enumerate() {
        if endpoint.name.trim().is_empty() {
            errors.push(ValidationError::EmptyName {
                service: endpoint.service,
                index,
            });
            continue;
        }

        if !seen.insert((endpoint.service, endpoint.name.as_str())) {
            errors.push(ValidationError::DuplicateEndpoint {
                service: endpoint.service,
                name: endpoint.name.clone(),
            });
        }

        if let Err(reason) = check_base_url(&endpoint.base_url) {
            errors.push(ValidationError::InvalidBaseUrl {
                service: endpoint.service,
                name: endpoint.name.clone(),
                reason,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_base_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("unsupported scheme '{}'", other)),
    }
}
