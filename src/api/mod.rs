//! HTTP trigger API
//!
//! A small axum server that starts collection runs and exposes what has been
//! stored, plus an OpenAPI description of itself.

use crate::{Collector, Config, Result};
use axum::{Router, routing::get};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod error_response;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::AppState;

/// Create the API router with all route definitions
///
/// # Routes
///
/// - `GET /run` - Collect the current month for every region
/// - `GET /trades/:region?year=&month=` - Stored trades for one region and month
/// - `GET /health` - Health check
/// - `GET /openapi.json` - OpenAPI specification
/// - `GET /swagger-ui` - Interactive Swagger UI documentation (if enabled, spec served
///   from `/api-docs/openapi.json`)
pub fn create_router(collector: Arc<Collector>, config: Arc<Config>) -> Router {
    let state = AppState::new(collector, config.clone());

    let router = Router::new()
        .route("/run", get(routes::run_collection))
        .route("/trades/:region", get(routes::list_trades))
        .route("/health", get(routes::health_check))
        .route("/openapi.json", get(routes::openapi_spec));

    let router = if config.server.swagger_ui {
        router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
    } else {
        router
    };

    router.with_state(state).layer(TraceLayer::new_for_http())
}

/// Start the API server on the configured bind address
///
/// Serves until `shutdown` completes, then lets in-flight requests finish.
/// A collection run in progress is allowed to complete, so its region
/// transaction is never cut off half way.
///
/// # Example
///
/// ```no_run
/// use rtms_collector::{Collector, Config, Database};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Arc::new(Config::from_env()?);
/// let db = Arc::new(Database::new(&config.database).await?);
/// let collector = Arc::new(Collector::new(config.clone(), db)?);
///
/// rtms_collector::api::start_api_server(collector, config, rtms_collector::shutdown_signal())
///     .await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_api_server<F>(
    collector: Arc<Collector>,
    config: Arc<Config>,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let bind_address = config.server.bind_address;

    tracing::info!(address = %bind_address, "Starting API server");

    let app = create_router(collector, config);

    let listener = TcpListener::bind(bind_address)
        .await
        .map_err(crate::error::Error::Io)?;

    tracing::info!(address = %bind_address, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| crate::error::Error::ApiServerError(e.to_string()))?;

    tracing::info!("API server stopped");
    Ok(())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
