//! Rolling check history.
//!
//! # Data Flow
//! ```text
//! CheckResult (from a check cycle)
//!     → store.rs append (load → insert at front → truncate → save)
//!     → history file: { service: { endpoint: [newest, ..., oldest] } }
//! ```
//!
//! # Design Decisions
//! - Reads are tolerant: a damaged file never blocks checking
//! - Writes are strict: a failed save is returned to the caller
//! - Appends are sequential; concurrent writers must be serialized externally

pub mod store;

pub use store::{History, HistoryError, HistoryStore, HistorySummary, DEFAULT_HISTORY_LIMIT};
