//! Collection runs across all configured regions

use crate::config::Config;
use crate::db::Database;
use crate::error::Result;
use crate::fetcher::TradeFetcher;
use crate::types::{CollectionReport, DealMonth};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Runs the fetch pipeline for every configured region
///
/// Regions are processed one after another. A failure in one region is
/// recorded in the report and never stops the others. Only one run executes
/// at a time; a second trigger waits for the first to finish.
pub struct Collector {
    fetcher: TradeFetcher,
    config: Arc<Config>,
    db: Arc<Database>,
    run_lock: Mutex<()>,
}

impl Collector {
    /// Create a collector for the given configuration and database
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn new(config: Arc<Config>, db: Arc<Database>) -> Result<Self> {
        let fetcher = TradeFetcher::new(db.clone(), config.api.clone())?;

        Ok(Self {
            fetcher,
            config,
            db,
            run_lock: Mutex::new(()),
        })
    }

    /// Collect the current month for every region
    pub async fn run(&self) -> Result<CollectionReport> {
        self.run_for(DealMonth::current()).await
    }

    /// Collect the given month for every region
    ///
    /// # Errors
    /// Returns [`Error::Config`](crate::Error::Config) before any request is
    /// made if the configuration is incomplete. Per-region failures are
    /// reported inside the returned [`CollectionReport`] instead.
    pub async fn run_for(&self, month: DealMonth) -> Result<CollectionReport> {
        self.config.validate()?;

        let _guard = self.run_lock.lock().await;
        info!(month = %month, regions = self.config.regions.len(), "Starting collection run");

        let mut report = CollectionReport::default();
        for region in &self.config.regions {
            let outcome = self.fetcher.fetch_and_store(region, month).await;
            report.record(region, outcome);
        }

        let failed = report.failed_regions();
        if failed.is_empty() {
            info!(
                month = %month,
                total_inserted = report.total_inserted_all_regions,
                "Collection run complete"
            );
        } else {
            warn!(
                month = %month,
                total_inserted = report.total_inserted_all_regions,
                failed = ?failed,
                "Collection run complete with failed regions"
            );
        }

        Ok(report)
    }

    /// Database the collector writes to
    pub fn db(&self) -> &Arc<Database> {
        &self.db
    }
}
