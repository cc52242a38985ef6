//! # rtms-collector
//!
//! Collects apartment trade records for Seoul's 25 districts from the MOLIT
//! real-transaction API and stores them in a relational `real_estate` table.
//!
//! ## How a run works
//!
//! - Every configured region is fetched page by page for one deal month.
//! - Each item is coerced field by field; unparseable numbers become `NULL`.
//! - Items from other months are skipped, duplicates (by natural key) are ignored.
//! - Each region is stored in its own transaction: it lands completely or not at all.
//! - A failing region is reported and the run moves on to the next one.
//!
//! ## Quick Start
//!
//! ```no_run
//! use rtms_collector::{Collector, Config, Database};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Arc::new(Config::from_env()?);
//!     let db = Arc::new(Database::new(&config.database).await?);
//!     let collector = Collector::new(config, db)?;
//!
//!     let report = collector.run().await?;
//!     println!("inserted {}", report.total_inserted_all_regions);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// HTTP trigger API
pub mod api;
/// Collection runs across regions
pub mod collector;
/// Configuration types
pub mod config;
/// Database persistence layer
pub mod db;
/// Error types
pub mod error;
/// Paged trade API client
pub mod fetcher;
/// Periodic collection
pub mod scheduler;
/// Core types
pub mod types;
/// Utility functions
pub mod utils;

#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used types
pub use collector::Collector;
pub use config::Config;
pub use db::Database;
pub use error::{ApiError, DatabaseError, Error, ErrorDetail, Result, ToHttpStatus};
pub use fetcher::TradeFetcher;
pub use types::{CollectionReport, DealMonth, RegionOutcome, TradeRecord};

/// Resolves when the process is asked to stop
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
#[cfg(unix)]
pub async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Signal handlers may fail to register in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

/// Resolves when the process is asked to stop (Ctrl+C)
#[cfg(not(unix))]
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
