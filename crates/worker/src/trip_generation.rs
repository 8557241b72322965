//! Timer loop that keeps the rolling trip horizon materialized.

use std::sync::Arc;

use chrono::Utc;
use fleetops_core::errors::OpsResult;
use fleetops_core::models::events::NotificationEvent;
use fleetops_core::models::trip::TripGenerationSummary;
use fleetops_service::OpsState;
use fleetops_service::trips;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::config::WorkerConfig;
use crate::notifier::{Notifier, dispatch};

/// One generation pass over `[today, today + horizon]`, emitting a summary
/// event. Exposed separately from the loop so tests can drive cycles
/// directly.
pub async fn run_trip_generation_cycle(
    state: &OpsState,
    notifier: &Arc<dyn Notifier>,
    horizon_days: i64,
) -> OpsResult<TripGenerationSummary> {
    let today = Utc::now().date_naive();
    let summary = trips::generate_all_trips(state, today, horizon_days).await?;
    dispatch(
        notifier.clone(),
        NotificationEvent::TripGenerationSummary(summary),
    );
    Ok(summary)
}

/// Runs generation cycles for the process lifetime. A failed cycle is logged
/// and the timer keeps going; the shutdown signal is only checked between
/// cycles, so an in-flight pass finishes before the loop exits.
pub async fn run_trip_generation_loop(
    state: Arc<OpsState>,
    notifier: Arc<dyn Notifier>,
    config: WorkerConfig,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(config.trip_generation_period());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!(
        period_secs = config.trip_generation_period_secs,
        horizon_days = config.trip_horizon_days,
        "trip generation loop started"
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match run_trip_generation_cycle(&state, &notifier, config.trip_horizon_days).await {
                    Ok(summary) => info!(
                        schedules_processed = summary.schedules_processed,
                        trips_generated = summary.trips_generated,
                        "trip generation cycle complete"
                    ),
                    Err(err) => error!(
                        error = %err,
                        "trip generation cycle failed; next cycle will retry"
                    ),
                }
            }
            _ = shutdown.changed() => {
                info!("trip generation loop stopping");
                break;
            }
        }
    }
}
