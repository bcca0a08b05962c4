//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! health + history subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms via the metrics facade)
//! ```
//!
//! # Design Decisions
//! - Structured fields (service, name, sub_status) on every probe event
//! - The library installs no metrics recorder; the embedding application does

pub mod logging;
pub mod metrics;
