//! Periodic collection runs
//!
//! When `COLLECT_INTERVAL_SECS` is set, the binary spawns a
//! [`CollectionScheduler`] next to the HTTP server. Each tick runs the same
//! pipeline as `GET /run`; the run lock in [`Collector`] keeps a scheduled run
//! and a triggered run from overlapping.
//!
//! # Example
//!
//! ```no_run
//! use rtms_collector::{Collector, Database, config::Config};
//! use rtms_collector::scheduler::CollectionScheduler;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Arc::new(Config::from_env()?);
//! let db = Arc::new(Database::new(&config.database).await?);
//! let collector = Arc::new(Collector::new(config, db)?);
//!
//! let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let scheduler = CollectionScheduler::new(collector, Duration::from_secs(3600));
//! let handle = tokio::spawn(scheduler.run(shutdown_rx));
//!
//! // later
//! shutdown_tx.send(true)?;
//! handle.await?;
//! # Ok(())
//! # }
//! ```

use crate::collector::Collector;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info};

/// Runs a collection for the current month at a fixed interval
pub struct CollectionScheduler {
    /// Collector shared with the HTTP server
    collector: Arc<Collector>,

    /// Time between runs
    period: Duration,
}

impl CollectionScheduler {
    /// Creates a new scheduler
    pub fn new(collector: Arc<Collector>, period: Duration) -> Self {
        Self { collector, period }
    }

    /// Run until `shutdown` turns `true` or its sender is dropped
    ///
    /// The first run happens one full period after start.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(period = ?self.period, "Collection scheduler started");

        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // interval() yields immediately on the first tick
        ticker.tick().await;

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                _ = ticker.tick() => {
                    match self.collector.run().await {
                        Ok(report) => info!(
                            total_inserted = report.total_inserted_all_regions,
                            failed_regions = report.failed_regions().len(),
                            "Scheduled collection finished"
                        ),
                        Err(e) => error!(error = %e, "Scheduled collection failed"),
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        info!("Collection scheduler shutting down");
    }
}
