//! Core types shared by the fetcher, the store and the API

use crate::error::{Error, Result};
use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use utoipa::ToSchema;

/// One apartment trade as reported by the real-transaction API
///
/// Field names serialize to the API's own element names (`aptNm`, `dealYear`, ...),
/// which are also the column names of the `real_estate` table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
    /// Building wing/dong within the complex
    pub apt_dong: Option<String>,
    /// Apartment complex name
    pub apt_nm: String,
    /// Year the building was completed
    pub build_year: Option<i32>,
    /// Deal amount in units of 10,000 KRW, thousands separators removed
    pub deal_amount: Option<String>,
    /// Day of month the deal was signed
    pub deal_day: Option<i32>,
    /// Month the deal was signed
    pub deal_month: Option<i32>,
    /// Year the deal was signed
    pub deal_year: Option<i32>,
    /// Exclusive-use area in square meters
    pub exclu_use_ar: Option<f64>,
    /// Floor number (negative for basements)
    pub floor: Option<i32>,
    /// Sigungu (district) code
    pub sgg_cd: String,
    /// Legal dong (neighbourhood) name
    pub umd_nm: Option<String>,
}

impl TradeRecord {
    /// Whether the deal was signed in the given month
    pub fn is_in(&self, month: DealMonth) -> bool {
        self.deal_year == Some(month.year) && self.deal_month == Some(month.month as i32)
    }
}

/// A calendar month used to scope one fetch (`DEAL_YMD`)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct DealMonth {
    /// Four-digit year
    pub year: i32,
    /// Month, 1-12
    pub month: u32,
}

impl DealMonth {
    /// Create a deal month, rejecting years outside 1000-9999 and months outside 1-12
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1000..=9999).contains(&year) {
            return Err(Error::InvalidInput(format!(
                "year must have four digits, got {}",
                year
            )));
        }
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidInput(format!(
                "month must be between 1 and 12, got {}",
                month
            )));
        }
        Ok(Self { year, month })
    }

    /// The current month in the local timezone
    pub fn current() -> Self {
        let now = Local::now();
        Self {
            year: now.year(),
            month: now.month(),
        }
    }

    /// Deal month identifier as sent in `DEAL_YMD`, e.g. `202403`
    pub fn deal_ymd(&self) -> String {
        format!("{}{:02}", self.year, self.month)
    }
}

impl fmt::Display for DealMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// Result of collecting one region
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RegionOutcome {
    /// Number of new rows committed for the region
    pub inserted_count: u64,
    /// Description of the failure, if the region was rolled back
    pub error: Option<String>,
}

impl RegionOutcome {
    /// Outcome of a region that committed successfully
    pub fn inserted(count: u64) -> Self {
        Self {
            inserted_count: count,
            error: None,
        }
    }

    /// Outcome of a region that failed and was rolled back
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            inserted_count: 0,
            error: Some(error.into()),
        }
    }

    /// Whether the region finished without error
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregated result of one collection run across all regions
///
/// Serializes flat: one key per region code plus `total_inserted_all_regions`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionReport {
    /// Per-region outcomes keyed by region code
    #[serde(flatten)]
    pub regions: BTreeMap<String, RegionOutcome>,
    /// Sum of inserted rows over every region
    pub total_inserted_all_regions: u64,
}

impl CollectionReport {
    /// Record a region outcome and add its count to the running total
    pub fn record(&mut self, region: &str, outcome: RegionOutcome) {
        self.total_inserted_all_regions += outcome.inserted_count;
        self.regions.insert(region.to_string(), outcome);
    }

    /// Region codes that failed during this run
    pub fn failed_regions(&self) -> Vec<&str> {
        self.regions
            .iter()
            .filter(|(_, outcome)| !outcome.is_success())
            .map(|(code, _)| code.as_str())
            .collect()
    }
}
