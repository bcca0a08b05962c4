//! Rolling check history persisted as one JSON file.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::Service;
use crate::health::state::CheckResult;
use crate::observability::metrics;

/// Records kept per endpoint unless configured otherwise.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Errors raised while persisting history.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to write history file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize history: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Per-endpoint result sequences, newest first.
pub type EndpointHistory = BTreeMap<String, Vec<CheckResult>>;

/// Full history: service → endpoint name → results.
///
/// Top-level keys that are not a known service are kept untouched and
/// written back on save.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct History {
    #[serde(default)]
    claude: EndpointHistory,

    #[serde(default)]
    codex: EndpointHistory,

    #[serde(flatten)]
    other: BTreeMap<String, Value>,
}

impl History {
    /// History with an empty map for every known service.
    pub fn empty() -> Self {
        Self {
            claude: EndpointHistory::new(),
            codex: EndpointHistory::new(),
            other: BTreeMap::new(),
        }
    }

    pub fn service(&self, service: Service) -> &EndpointHistory {
        match service {
            Service::Claude => &self.claude,
            Service::Codex => &self.codex,
        }
    }

    fn service_mut(&mut self, service: Service) -> &mut EndpointHistory {
        match service {
            Service::Claude => &mut self.claude,
            Service::Codex => &mut self.codex,
        }
    }

    /// Stored results for one endpoint, newest first.
    pub fn endpoint(&self, service: Service, name: &str) -> &[CheckResult] {
        self.service(service)
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Insert a result at the front of its endpoint's sequence and truncate to `limit`.
    pub fn record(&mut self, result: CheckResult, limit: usize) {
        let records = self
            .service_mut(result.service)
            .entry(result.name.clone())
            .or_default();
        records.insert(0, result);
        records.truncate(limit);
    }
}

impl Default for History {
    fn default() -> Self {
        Self::empty()
    }
}

/// Availability statistics over one endpoint's stored results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistorySummary {
    pub total: usize,
    pub available: usize,
    /// Percentage of stored results that were available (0.0 when empty).
    pub availability_rate: f64,
}

impl HistorySummary {
    pub fn from_records(records: &[CheckResult]) -> Self {
        let total = records.len();
        let available = records.iter().filter(|r| r.is_available()).count();
        let availability_rate = if total == 0 {
            0.0
        } else {
            available as f64 / total as f64 * 100.0
        };

        Self {
            total,
            available,
            availability_rate,
        }
    }
}

/// File-backed history store.
///
/// Reads never fail: missing or damaged storage reads as empty history.
/// Writes propagate every failure to the caller.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
    limit: usize,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Set the number of records kept per endpoint.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Load the full history.
    pub fn load_all(&self) -> History {
        if !self.path.exists() {
            return History::empty();
        }

        match self.read() {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to load history, starting empty"
                );
                History::empty()
            }
        }
    }

    fn read(&self) -> Result<History, Box<dyn std::error::Error>> {
        let file = File::open(&self.path)?;
        let history = serde_json::from_reader(BufReader::new(file))?;
        Ok(history)
    }

    /// Load one endpoint's results, newest first.
    pub fn load(&self, service: Service, name: &str) -> Vec<CheckResult> {
        self.load_all().endpoint(service, name).to_vec()
    }

    /// Summarize one endpoint's stored results.
    pub fn summary(&self, service: Service, name: &str) -> HistorySummary {
        HistorySummary::from_records(self.load_all().endpoint(service, name))
    }

    /// Record a result and write the whole history back.
    pub fn append(&self, result: &CheckResult) -> Result<(), HistoryError> {
        let mut history = self.load_all();
        history.record(result.clone(), self.limit);

        self.save(&history).inspect_err(|e| {
            metrics::record_history_write_failure();
            tracing::error!(path = %self.path.display(), error = %e, "Failed to save history");
        })
    }

    fn save(&self, history: &History) -> Result<(), HistoryError> {
        let io_error = |source| HistoryError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let file = File::create(&self.path).map_err(io_error)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, history)?;
        writer.flush().map_err(io_error)?;

        tracing::debug!(path = %self.path.display(), "History saved");
        Ok(())
    }
}
