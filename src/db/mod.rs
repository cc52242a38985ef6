//! Database layer for rtms-collector
//!
//! Persists trade records in the `real_estate` table. Connections go through the
//! sqlx `Any` driver so the same queries run against MySQL in production and
//! SQLite in tests.
//!
//! ## Submodules
//!
//! Methods on [`Database`] are organized by domain:
//! - [`migrations`] - Connection lifecycle, schema migrations
//! - [`trades`] - Per-region transactions, natural-key dedup, read queries

use crate::types::TradeRecord;
use sqlx::{AnyPool, FromRow};

mod migrations;
mod trades;

pub use trades::TradeTransaction;

/// Trade record as stored in the `real_estate` table
///
/// Integer columns are read as `i64` so the row decodes the same way from
/// MySQL `INT` and SQLite `INTEGER`.
#[derive(Debug, Clone, FromRow)]
#[sqlx(rename_all = "camelCase")]
pub struct TradeRow {
    /// Building wing/dong
    pub apt_dong: Option<String>,
    /// Complex name
    pub apt_nm: String,
    /// Completion year
    pub build_year: Option<i64>,
    /// Deal amount without separators
    pub deal_amount: Option<String>,
    /// Deal day
    pub deal_day: Option<i64>,
    /// Deal month
    pub deal_month: Option<i64>,
    /// Deal year
    pub deal_year: Option<i64>,
    /// Exclusive-use area (m²)
    pub exclu_use_ar: Option<f64>,
    /// Floor
    pub floor: Option<i64>,
    /// District code
    pub sgg_cd: String,
    /// Legal dong name
    pub umd_nm: Option<String>,
}

impl From<TradeRow> for TradeRecord {
    fn from(row: TradeRow) -> Self {
        let narrow = |value: Option<i64>| value.and_then(|v| i32::try_from(v).ok());

        TradeRecord {
            apt_dong: row.apt_dong,
            apt_nm: row.apt_nm,
            build_year: narrow(row.build_year),
            deal_amount: row.deal_amount,
            deal_day: narrow(row.deal_day),
            deal_month: narrow(row.deal_month),
            deal_year: narrow(row.deal_year),
            exclu_use_ar: row.exclu_use_ar,
            floor: narrow(row.floor),
            sgg_cd: row.sgg_cd,
            umd_nm: row.umd_nm,
        }
    }
}

/// Database handle for rtms-collector
pub struct Database {
    pool: AnyPool,
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
