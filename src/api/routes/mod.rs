//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`collect`] - Collection trigger
//! - [`trades`] - Stored trade lookup
//! - [`system`] - Health, OpenAPI

use serde::{Deserialize, Serialize};

mod collect;
mod system;
mod trades;

pub use collect::*;
pub use system::*;
pub use trades::*;

/// Query parameters for GET /trades/:region
///
/// Missing values default to the current year and month.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::IntoParams, utoipa::ToSchema)]
#[into_params(parameter_in = Query)]
pub struct TradesQuery {
    /// Deal year, e.g. 2024
    pub year: Option<i32>,
    /// Deal month, 1-12
    pub month: Option<u32>,
}
