//! Paged retrieval of apartment trades from the trade API
//!
//! A [`TradeFetcher`] walks every page of one region's monthly listing, coerces
//! each item into a [`TradeRecord`](crate::types::TradeRecord) and stores the
//! new ones inside a single transaction. A region either lands completely or
//! not at all.

use crate::config::ApiSourceConfig;
use crate::db::{Database, TradeTransaction};
use crate::error::{Error, Result};
use crate::types::{DealMonth, RegionOutcome};
use std::sync::Arc;
use tracing::{debug, info, warn};

mod response;

pub use response::{RawTradeItem, TradePage, parse_page};

/// Fetches trade pages for a region and persists them
pub struct TradeFetcher {
    /// HTTP client for the trade API
    http_client: reqwest::Client,

    /// Database the records are stored in
    db: Arc<Database>,

    /// Endpoint, credentials and paging settings
    api: ApiSourceConfig,
}

impl TradeFetcher {
    /// Create a new fetcher
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn new(db: Arc<Database>, api: ApiSourceConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(api.timeout())
            .user_agent(concat!("rtms-collector/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            db,
            api,
        })
    }

    /// Fetch every page for `region` and `month` and store new trades
    ///
    /// Never fails: any error rolls the region's transaction back and is
    /// reported in the returned [`RegionOutcome`].
    pub async fn fetch_and_store(&self, region: &str, month: DealMonth) -> RegionOutcome {
        match self.try_fetch_and_store(region, month).await {
            Ok(inserted) => {
                info!(region, month = %month, inserted, "Region collected");
                RegionOutcome::inserted(inserted)
            }
            Err(e) => {
                warn!(region, month = %month, error = %e, "Region collection failed");
                RegionOutcome::failed(format!("region {} failed: {}", region, e))
            }
        }
    }

    async fn try_fetch_and_store(&self, region: &str, month: DealMonth) -> Result<u64> {
        let mut tx = self.db.begin().await?;

        match self.store_all_pages(&mut tx, region, month).await {
            Ok(inserted) => {
                tx.commit().await?;
                Ok(inserted)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(region, error = %rollback_err, "Failed to roll back region transaction");
                }
                Err(e)
            }
        }
    }

    /// Walk pages until one is empty or short, inserting in-month records
    async fn store_all_pages(
        &self,
        tx: &mut TradeTransaction,
        region: &str,
        month: DealMonth,
    ) -> Result<u64> {
        let mut inserted = 0u64;
        let mut page_no = 1u32;

        loop {
            let page = self.fetch_page(region, month, page_no).await?;
            let item_count = page.items.len();
            debug!(region, page_no, item_count, total = ?page.total_count, "Fetched page");

            if item_count == 0 {
                break;
            }

            for item in &page.items {
                let record = item.to_record(region);
                if !record.is_in(month) {
                    warn!(
                        region,
                        month = %month,
                        deal_year = ?record.deal_year,
                        deal_month = ?record.deal_month,
                        apt = %record.apt_nm,
                        "Skipping trade outside requested month"
                    );
                    continue;
                }
                if tx.insert_if_absent(&record).await? {
                    inserted += 1;
                }
            }

            if (item_count as u32) < self.api.page_size {
                break;
            }
            page_no += 1;
        }

        Ok(inserted)
    }

    /// Fetch and parse a single page
    ///
    /// # Errors
    /// - [`Error::Network`] if the request cannot be sent or the body read
    /// - [`Error::Transport`] on a non-success HTTP status
    /// - [`Error::MalformedResponse`] if the body is not well-formed XML
    /// - [`Error::Upstream`] if the API reports an error result code
    pub async fn fetch_page(
        &self,
        region: &str,
        month: DealMonth,
        page_no: u32,
    ) -> Result<TradePage> {
        let response = self
            .http_client
            .get(&self.api.endpoint)
            .query(&[
                ("serviceKey", self.api.service_key.as_str()),
                ("LAWD_CD", region),
                ("DEAL_YMD", month.deal_ymd().as_str()),
                ("numOfRows", self.api.page_size.to_string().as_str()),
                ("pageNo", page_no.to_string().as_str()),
                ("dataType", "XML"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport(format!(
                "trade API returned HTTP {} for page {}",
                status.as_u16(),
                page_no
            )));
        }

        let body = response.text().await?;
        let page = parse_page(&body)?;
        page.check_result()?;

        Ok(page)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
