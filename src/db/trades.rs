//! Trade persistence: per-region transactions and natural-key dedup.

use crate::error::DatabaseError;
use crate::types::{DealMonth, TradeRecord};
use crate::{Error, Result};
use sqlx::Transaction;
use sqlx::any::Any;

use super::{Database, TradeRow};

/// Natural-key lookup with null-safe comparison on every nullable column
///
/// `(col = ? OR (col IS NULL AND ? IS NULL))` behaves like MySQL `<=>` and
/// SQLite `IS`, but is accepted by both.
const EXISTS_BY_NATURAL_KEY: &str = r#"
    SELECT 1 FROM real_estate
    WHERE (dealYear = ? OR (dealYear IS NULL AND ? IS NULL))
      AND (dealMonth = ? OR (dealMonth IS NULL AND ? IS NULL))
      AND (dealDay = ? OR (dealDay IS NULL AND ? IS NULL))
      AND sggCd = ?
      AND aptNm = ?
      AND (excluUseAr = ? OR (excluUseAr IS NULL AND ? IS NULL))
      AND (floor = ? OR (floor IS NULL AND ? IS NULL))
      AND (aptDong = ? OR (aptDong IS NULL AND ? IS NULL))
    LIMIT 1
"#;

const INSERT_TRADE: &str = r#"
    INSERT INTO real_estate (
        aptDong, aptNm, buildYear, dealAmount,
        dealDay, dealMonth, dealYear, excluUseAr,
        floor, sggCd, umdNm
    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

const TRADE_COLUMNS: &str = r#"
    aptDong, aptNm, buildYear, dealAmount, dealDay, dealMonth,
    dealYear, excluUseAr, floor, sggCd, umdNm
"#;

/// An open transaction scoped to one region's fetch
///
/// Dropping the guard without calling [`commit`](Self::commit) rolls the
/// transaction back, so every exit path releases the connection.
pub struct TradeTransaction {
    tx: Transaction<'static, Any>,
}

impl TradeTransaction {
    /// Insert `record` unless a row with the same natural key exists
    ///
    /// Returns `true` if a row was written.
    pub async fn insert_if_absent(&mut self, record: &TradeRecord) -> Result<bool> {
        if self.exists(record).await? {
            return Ok(false);
        }
        self.insert(record).await?;
        Ok(true)
    }

    /// Whether a row with the record's natural key is already stored
    pub async fn exists(&mut self, record: &TradeRecord) -> Result<bool> {
        let row = sqlx::query(EXISTS_BY_NATURAL_KEY)
            .bind(record.deal_year)
            .bind(record.deal_year)
            .bind(record.deal_month)
            .bind(record.deal_month)
            .bind(record.deal_day)
            .bind(record.deal_day)
            .bind(record.sgg_cd.as_str())
            .bind(record.apt_nm.as_str())
            .bind(record.exclu_use_ar)
            .bind(record.exclu_use_ar)
            .bind(record.floor)
            .bind(record.floor)
            .bind(record.apt_dong.as_deref())
            .bind(record.apt_dong.as_deref())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| {
                Error::Database(DatabaseError::QueryFailed(format!(
                    "Failed to check for existing trade: {}",
                    e
                )))
            })?;

        Ok(row.is_some())
    }

    async fn insert(&mut self, record: &TradeRecord) -> Result<()> {
        sqlx::query(INSERT_TRADE)
            .bind(record.apt_dong.as_deref())
            .bind(record.apt_nm.as_str())
            .bind(record.build_year)
            .bind(record.deal_amount.as_deref())
            .bind(record.deal_day)
            .bind(record.deal_month)
            .bind(record.deal_year)
            .bind(record.exclu_use_ar)
            .bind(record.floor)
            .bind(record.sgg_cd.as_str())
            .bind(record.umd_nm.as_deref())
            .execute(&mut *self.tx)
            .await
            .map_err(|e| {
                Error::Database(DatabaseError::QueryFailed(format!(
                    "Failed to insert trade: {}",
                    e
                )))
            })?;

        Ok(())
    }

    /// Commit every insert made through this transaction
    pub async fn commit(self) -> Result<()> {
        self.tx.commit().await.map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to commit transaction: {}",
                e
            )))
        })
    }

    /// Discard every insert made through this transaction
    pub async fn rollback(self) -> Result<()> {
        self.tx.rollback().await.map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to roll back transaction: {}",
                e
            )))
        })
    }
}

impl Database {
    /// Open a transaction for one region's fetch
    pub async fn begin(&self) -> Result<TradeTransaction> {
        let tx = self.pool.begin().await.map_err(|e| {
            Error::Database(DatabaseError::ConnectionFailed(format!(
                "Failed to begin transaction: {}",
                e
            )))
        })?;

        Ok(TradeTransaction { tx })
    }

    /// Number of stored trades for a region and month
    pub async fn count_trades(&self, region: &str, month: DealMonth) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM real_estate WHERE sggCd = ? AND dealYear = ? AND dealMonth = ?",
        )
        .bind(region)
        .bind(month.year)
        .bind(month.month as i32)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            Error::Database(DatabaseError::QueryFailed(format!(
                "Failed to count trades: {}",
                e
            )))
        })?;

        Ok(count)
    }

    /// Stored trades for a region and month, ordered by deal day
    pub async fn list_trades(&self, region: &str, month: DealMonth) -> Result<Vec<TradeRecord>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM real_estate
            WHERE sggCd = ? AND dealYear = ? AND dealMonth = ?
            ORDER BY dealDay, aptNm, floor
            "#,
            TRADE_COLUMNS
        );

        let rows = sqlx::query_as::<_, TradeRow>(&sql)
            .bind(region)
            .bind(month.year)
            .bind(month.month as i32)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                Error::Database(DatabaseError::QueryFailed(format!(
                    "Failed to list trades: {}",
                    e
                )))
            })?;

        Ok(rows.into_iter().map(TradeRecord::from).collect())
    }
}
