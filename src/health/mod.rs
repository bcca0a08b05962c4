//! Endpoint health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Check cycle (monitor.rs):
//!     EndpointConfig list
//!     → filter enabled endpoints
//!     → spawn one probe per endpoint, gated by a semaphore
//!     → gather one CheckResult per endpoint
//!
//! Probe (probe.rs):
//!     Build provider-shaped request
//!     → POST with per-probe timeout
//!     → classify.rs (status + latency, then content rule)
//!     → content.rs (JSON / SSE text extraction)
//!
//! State (state.rs):
//!     Available > Degraded > Unavailable, plus a sub-status reason
//! ```
//!
//! # Design Decisions
//! - Probe failures are data (CheckResult), never errors
//! - Classification is pure and tested without a network
//! - Probes are independent; one timing out never affects another

pub mod classify;
pub mod content;
pub mod monitor;
pub mod probe;
pub mod state;

pub use classify::{apply_content_check, classify_base};
pub use content::extract_text;
pub use monitor::{sort_results, AvailabilityMonitor};
pub use probe::{build_probe_request, HttpProber, ProbeError, ProbeRequest, Prober};
pub use state::{CheckResult, SubStatus, Tristate};
