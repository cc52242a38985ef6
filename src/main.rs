//! rtms-collector binary: HTTP trigger server with an optional schedule.

use rtms_collector::scheduler::CollectionScheduler;
use rtms_collector::{Collector, Config, Database, Result, api, shutdown_signal};
use std::sync::Arc;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is normal in production
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return Err(e);
        }
    };

    let db = Arc::new(Database::new(&config.database).await?);
    let collector = Arc::new(Collector::new(config.clone(), db.clone())?);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let scheduler_handle = config.schedule.interval().map(|period| {
        let scheduler = CollectionScheduler::new(collector.clone(), period);
        tokio::spawn(scheduler.run(shutdown_rx.clone()))
    });

    let server_result = api::start_api_server(collector, config, async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    })
    .await;

    if let Some(handle) = scheduler_handle {
        if let Err(e) = handle.await {
            tracing::error!(error = %e, "Scheduler task failed");
        }
    }

    db.close().await;
    tracing::info!("Shutdown complete");

    server_result
}
