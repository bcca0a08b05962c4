//! Response classification.
//!
//! # Responsibilities
//! - Map HTTP status + latency to a base (tristate, sub-status)
//! - Overlay the response-content rule on top of the base state
//!
//! # Design Decisions
//! - Pure functions, no I/O
//! - Redirects count as healthy
//! - Rate-limited bodies are never content-checked

use crate::health::content::extract_text;
use crate::health::state::{SubStatus, Tristate};

/// Classify a response from its status code and latency.
pub fn classify_base(status_code: u16, latency_ms: u64, slow_threshold_ms: u64) -> (Tristate, SubStatus) {
    match status_code {
        200..=299 if latency_ms > slow_threshold_ms => (Tristate::Degraded, SubStatus::SlowLatency),
        200..=299 => (Tristate::Available, SubStatus::None),
        300..=399 => (Tristate::Available, SubStatus::None),
        401 | 403 => (Tristate::Unavailable, SubStatus::AuthError),
        400 => (Tristate::Unavailable, SubStatus::InvalidRequest),
        429 => (Tristate::Unavailable, SubStatus::RateLimit),
        500..=u16::MAX => (Tristate::Unavailable, SubStatus::ServerError),
        _ => (Tristate::Unavailable, SubStatus::ClientError),
    }
}

/// Apply the expected-substring rule to a base classification.
pub fn apply_content_check(
    base_tristate: Tristate,
    base_sub_status: SubStatus,
    body: &[u8],
    expected_substring: Option<&str>,
) -> (Tristate, SubStatus) {
    let base = (base_tristate, base_sub_status);

    let expected = match expected_substring {
        Some(expected) if !expected.is_empty() => expected,
        _ => return base,
    };

    if base_tristate == Tristate::Unavailable || base_sub_status == SubStatus::RateLimit {
        return base;
    }

    let text = extract_text(body);
    if text.trim().is_empty() || !text.contains(expected) {
        return (Tristate::Unavailable, SubStatus::ContentMismatch);
    }

    base
}
