use std::sync::Arc;

use color_eyre::eyre::Result;
use dotenv::dotenv;
use fleetops_core::recurrence::HolidayCalendar;
use fleetops_service::OpsState;
use fleetops_service::config::OpsConfig;
use fleetops_store::MemoryStore;
use fleetops_worker::config::WorkerConfig;
use fleetops_worker::notifier::TracingNotifier;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = OpsConfig::from_env()?;
    let worker_config = WorkerConfig::from_env()?;

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // School holidays arrive as comma-separated ISO dates until a calendar
    // integration supplies them.
    let holidays: Vec<chrono::NaiveDate> = std::env::var("SCHOOL_HOLIDAYS")
        .ok()
        .map(|raw| {
            raw.split(',')
                .filter_map(|date| date.trim().parse().ok())
                .collect()
        })
        .unwrap_or_default();

    let calendar = Arc::new(HolidayCalendar::from_dates(holidays));
    let scoring = Arc::new(config.scoring_policy());
    let state = Arc::new(OpsState::with_memory_store(
        MemoryStore::new(),
        calendar,
        scoring,
    ));

    // Start the background workers
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handles = fleetops_worker::start_workers(
        state,
        Arc::new(TracingNotifier),
        worker_config,
        shutdown_rx,
    );

    info!("fleetops workers running; press ctrl-c to stop");
    tokio::signal::ctrl_c().await?;

    info!("shutdown requested; letting in-flight work finish");
    shutdown_tx.send(true)?;
    for handle in handles {
        handle.await?;
    }

    Ok(())
}
