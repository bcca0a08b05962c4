//! Endpoint availability probe (v1)
//!
//! Runs one check cycle over the configured inference endpoints and appends
//! every result to the rolling history file.
//!
//! # Architecture Overview
//!
//! ```text
//!   availability.toml
//!         │
//!         ▼
//!   ┌───────────┐    ┌─────────────────────┐    ┌──────────────┐
//!   │  config   │───▶│ AvailabilityMonitor │───▶│  HttpProber  │──▶ POST /v1/messages
//!   │  loader   │    │ (semaphore fan-out) │    │ (per probe)  │──▶ POST /v1/chat/completions
//!   └───────────┘    └──────────┬──────────┘    └──────┬───────┘
//!                               │                      │
//!                               │               ┌──────▼───────┐
//!                               │               │  classify +  │
//!                               │               │   content    │
//!                               ▼               └──────────────┘
//!                       ┌──────────────┐
//!                       │ HistoryStore │──▶ site_availability.json
//!                       └──────────────┘
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use availability_probe::config::{load_config, Service};
use availability_probe::health::{sort_results, AvailabilityMonitor, CheckResult, HttpProber};
use availability_probe::history::{HistoryStore, HistorySummary};
use availability_probe::observability::logging;

#[derive(Parser)]
#[command(name = "availability-probe")]
#[command(about = "Probe inference API endpoints and keep a rolling availability history", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "availability.toml")]
    config: PathBuf,

    /// Override the history file from the config
    #[arg(long)]
    history: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one check cycle and record the results
    Check {
        /// Only check endpoints of this service (claude, codex)
        #[arg(long)]
        service: Option<Service>,

        /// Only check endpoints with this name
        #[arg(long)]
        name: Option<String>,
    },
    /// Show stored results for one endpoint
    History {
        #[arg(long)]
        service: Service,

        #[arg(long)]
        name: String,
    },
}

#[derive(Serialize)]
struct EndpointReport {
    service: Service,
    name: String,
    summary: HistorySummary,
    records: Vec<CheckResult>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    logging::init(&config.observability)?;

    tracing::info!(
        config = %cli.config.display(),
        endpoints = config.endpoints.len(),
        timeout_secs = config.checker.timeout_secs,
        max_concurrency = config.checker.max_concurrency,
        "Configuration loaded"
    );

    let history_path = cli
        .history
        .unwrap_or_else(|| PathBuf::from(&config.history.path));
    let store = HistoryStore::new(history_path).with_limit(config.history.max_entries);

    match cli.command {
        Commands::Check { service, name } => {
            let endpoints: Vec<_> = config
                .endpoints
                .iter()
                .filter(|e| service.map_or(true, |s| e.service == s))
                .filter(|e| name.as_deref().map_or(true, |n| e.name == n))
                .cloned()
                .collect();

            let monitor = AvailabilityMonitor::new(HttpProber::new()?, &config.checker);
            let mut results = monitor.check_all(&endpoints).await;
            sort_results(&mut results);

            print_json(&results)?;

            for result in &results {
                store.append(result)?;
            }
        }
        Commands::History { service, name } => {
            let records = store.load(service, &name);
            let report = EndpointReport {
                service,
                summary: HistorySummary::from_records(&records),
                name,
                records,
            };
            print_json(&report)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
