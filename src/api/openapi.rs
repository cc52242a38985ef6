//! OpenAPI documentation and schema generation
//!
//! The specification is generated at compile time with utoipa and served at
//! `/openapi.json` (and through Swagger UI when enabled).

use utoipa::OpenApi;

/// OpenAPI documentation for the collector's HTTP API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "rtms-collector API",
        version = "0.1.0",
        description = "Triggers collection of Seoul apartment trade records and serves the stored rows",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        crate::api::routes::run_collection,
        crate::api::routes::list_trades,
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
    ),
    components(schemas(
        crate::types::TradeRecord,
        crate::types::RegionOutcome,
        crate::api::routes::TradesQuery,
        crate::error::ApiError,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "collection", description = "Collection runs - Fetch the current month for every region"),
        (name = "trades", description = "Stored trades - Read back what has been collected"),
        (name = "system", description = "System endpoints - Health checks, OpenAPI spec"),
    )
)]
pub struct ApiDoc;
