//! Bounded-concurrency check cycles.
//!
//! # Responsibilities
//! - Select the endpoints taking part in a cycle
//! - Fan probes out, at most `max_concurrency` in flight
//! - Return exactly one result per enabled endpoint
//!
//! # Design Decisions
//! - A semaphore is the only state shared between probes
//! - A task that dies (panic, closed gate) still yields a result
//! - Output order is unspecified; see [`sort_results`]

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures_util::future::join_all;
use tokio::sync::Semaphore;

use crate::config::{CheckerConfig, EndpointConfig};
use crate::health::probe::Prober;
use crate::health::state::{CheckResult, Tristate};
use crate::observability::metrics;

/// Runs check cycles over a set of endpoints.
pub struct AvailabilityMonitor<P> {
    prober: Arc<P>,
    timeout: Duration,
    max_concurrency: usize,
}

impl<P: Prober> AvailabilityMonitor<P> {
    pub fn new(prober: P, config: &CheckerConfig) -> Self {
        Self {
            prober: Arc::new(prober),
            timeout: Duration::from_secs(config.timeout_secs),
            max_concurrency: config.max_concurrency.max(1),
        }
    }

    /// Override the per-probe timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Probe every enabled endpoint once.
    pub async fn check_all(&self, endpoints: &[EndpointConfig]) -> Vec<CheckResult> {
        let enabled: Vec<&EndpointConfig> = endpoints.iter().filter(|e| e.enable_check).collect();

        if enabled.is_empty() {
            tracing::info!("No endpoints enabled for checking");
            return Vec::new();
        }

        tracing::info!(
            count = enabled.len(),
            skipped = endpoints.len() - enabled.len(),
            max_concurrency = self.max_concurrency,
            timeout_ms = self.timeout.as_millis() as u64,
            "Starting check cycle"
        );

        let gate = Arc::new(Semaphore::new(self.max_concurrency));
        let mut handles = Vec::with_capacity(enabled.len());

        for endpoint in &enabled {
            let gate = gate.clone();
            let prober = self.prober.clone();
            let endpoint = (*endpoint).clone();
            let timeout = self.timeout;

            handles.push(tokio::spawn(async move {
                let _permit = gate.acquire_owned().await?;
                Ok::<_, tokio::sync::AcquireError>(prober.probe(&endpoint, timeout).await)
            }));
        }

        let outcomes = join_all(handles).await;

        let mut results = Vec::with_capacity(outcomes.len());
        for (endpoint, outcome) in enabled.iter().zip(outcomes) {
            let result = match outcome {
                Ok(Ok(result)) => result,
                Ok(Err(closed)) => fallback_result(endpoint, &closed.to_string()),
                Err(join_error) => fallback_result(endpoint, &join_error.to_string()),
            };
            results.push(result);
        }

        let available = results.iter().filter(|r| r.tristate == Tristate::Available).count();
        tracing::info!(
            total = results.len(),
            available,
            unavailable = results.len() - available,
            "Check cycle completed"
        );

        results
    }
}

/// Result for an endpoint whose probe task itself failed.
fn fallback_result(endpoint: &EndpointConfig, cause: &str) -> CheckResult {
    tracing::error!(
        service = %endpoint.service,
        name = %endpoint.name,
        error = %cause,
        "Probe task failed"
    );

    let result = CheckResult::network_failure(
        endpoint.service,
        endpoint.name.clone(),
        Utc::now(),
        format!("check failed: {}", cause),
    );
    metrics::record_check(&result);
    result
}

/// Order results by (service, name).
pub fn sort_results(results: &mut [CheckResult]) {
    results.sort_by(|a, b| (a.service, &a.name).cmp(&(b.service, &b.name)));
}
