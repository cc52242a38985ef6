//! Stored trade lookup.

use crate::api::AppState;
use crate::api::routes::TradesQuery;
use crate::error::{Error, Result};
use crate::types::{DealMonth, TradeRecord};
use crate::utils::is_valid_region_code;
use axum::{
    Json,
    extract::{Path, Query, State},
};

/// GET /trades/:region - Stored trades for one region and month
#[utoipa::path(
    get,
    path = "/trades/{region}",
    tag = "trades",
    params(
        ("region" = String, Path, description = "Five-digit region code, e.g. 11680"),
        TradesQuery
    ),
    responses(
        (status = 200, description = "Stored trades ordered by deal day", body = Vec<TradeRecord>),
        (status = 400, description = "Invalid region code or month", body = crate::error::ApiError),
        (status = 500, description = "Database error", body = crate::error::ApiError)
    )
)]
pub async fn list_trades(
    State(state): State<AppState>,
    Path(region): Path<String>,
    Query(query): Query<TradesQuery>,
) -> Result<Json<Vec<TradeRecord>>> {
    if !is_valid_region_code(&region) {
        return Err(Error::InvalidInput(format!(
            "region code must be five digits, got {:?}",
            region
        )));
    }

    let current = DealMonth::current();
    let month = DealMonth::new(
        query.year.unwrap_or(current.year),
        query.month.unwrap_or(current.month),
    )?;

    let trades = state.collector.db().list_trades(&region, month).await?;
    Ok(Json(trades))
}
