//! Collection trigger handler.

use crate::api::AppState;
use crate::error::Result;
use crate::types::CollectionReport;
use axum::{Json, extract::State};

/// GET /run - Collect the current month for every configured region
///
/// Responds once every region has been processed. Region failures are
/// reported per region inside the body; only a configuration error fails
/// the whole request.
#[utoipa::path(
    get,
    path = "/run",
    tag = "collection",
    responses(
        (status = 200, description = "Per-region outcomes keyed by region code, plus total_inserted_all_regions"),
        (status = 500, description = "Configuration error, nothing was fetched", body = crate::error::ApiError)
    )
)]
pub async fn run_collection(State(state): State<AppState>) -> Result<Json<CollectionReport>> {
    let report = state.collector.run().await?;
    Ok(Json(report))
}
