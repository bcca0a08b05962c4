//! Metrics emission.
//!
//! # Metrics
//! - `availability_checks_total` (counter): probes by service, tristate, sub_status
//! - `availability_check_latency_ms` (histogram): response latency by service
//! - `availability_history_write_failures_total` (counter)

use crate::health::state::CheckResult;

/// Record the outcome of one probe.
pub fn record_check(result: &CheckResult) {
    ::metrics::counter!(
        "availability_checks_total",
        "service" => result.service.as_str(),
        "tristate" => result.tristate.as_str(),
        "sub_status" => result.sub_status.as_str(),
    )
    .increment(1);

    if let Some(latency_ms) = result.latency_ms {
        ::metrics::histogram!(
            "availability_check_latency_ms",
            "service" => result.service.as_str(),
        )
        .record(latency_ms as f64);
    }
}

pub fn record_history_write_failure() {
    ::metrics::counter!("availability_history_write_failures_total").increment(1);
}
