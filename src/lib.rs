//! Inference endpoint availability probing library.

pub mod config;
pub mod health;
pub mod history;
pub mod observability;

pub use config::{EndpointConfig, MonitorConfig, Service};
pub use health::{AvailabilityMonitor, CheckResult, HttpProber, SubStatus, Tristate};
pub use history::HistoryStore;
