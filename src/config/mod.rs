//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → MonitorConfig (validated, immutable)
//!     → endpoints + tunables handed to the health monitor
//! ```
//!
//! # Design Decisions
//! - The health core never reads files; it receives EndpointConfig records
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::CheckerConfig;
pub use schema::EndpointConfig;
pub use schema::HistoryConfig;
pub use schema::MonitorConfig;
pub use schema::Service;
