//! Timer loop that computes replacement suggestions for pending leave
//! requests in small, serial batches.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use fleetops_core::errors::OpsResult;
use fleetops_core::models::events::NotificationEvent;
use fleetops_service::OpsState;
use fleetops_service::replacements;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::config::WorkerConfig;
use crate::notifier::{Notifier, dispatch};

/// One suggestion pass: select at most `suggestion_batch_size` stale Pending
/// requests, process them serially with the configured inter-item delay, and
/// emit one event per processed request. Returns how many requests were
/// processed. A failing item is logged with its id and skipped; the stamp
/// written by a successful pass keeps restarted or overlapping cycles from
/// renotifying.
pub async fn run_replacement_cycle(
    state: &OpsState,
    notifier: &Arc<dyn Notifier>,
    config: &WorkerConfig,
    now: DateTime<Utc>,
) -> OpsResult<usize> {
    let pending = state
        .leaves
        .list_pending_needing_suggestion(
            now,
            config.suggestion_freshness(),
            config.suggestion_batch_size,
        )
        .await?;

    let mut processed = 0;
    for (index, request) in pending.iter().enumerate() {
        if index > 0 {
            tokio::time::sleep(config.suggestion_item_delay()).await;
        }
        match replacements::build_suggestions(state, request.id, now).await {
            Ok(outcome) => {
                processed += 1;
                let event = match outcome.best() {
                    Some(best) => NotificationEvent::SuggestionFound {
                        leave_request_id: request.id,
                        driver_id: best.driver_id,
                        vehicle_id: best.vehicle_id,
                        score: best.score,
                    },
                    None => NotificationEvent::NoSuggestionAvailable {
                        leave_request_id: request.id,
                    },
                };
                dispatch(notifier.clone(), event);
            }
            Err(err) => {
                error!(
                    leave_request_id = %request.id,
                    error = %err,
                    "replacement suggestion failed; continuing with remaining requests"
                );
            }
        }
    }

    Ok(processed)
}

/// Runs suggestion cycles for the process lifetime. Shutdown is only checked
/// between cycles so an in-flight batch item finishes before exit.
pub async fn run_replacement_loop(
    state: Arc<OpsState>,
    notifier: Arc<dyn Notifier>,
    config: WorkerConfig,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(config.suggestion_period());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!(
        period_secs = config.suggestion_period_secs,
        batch_size = config.suggestion_batch_size,
        "replacement suggestion loop started"
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match run_replacement_cycle(&state, &notifier, &config, Utc::now()).await {
                    Ok(processed) if processed > 0 => {
                        info!(processed, "replacement suggestion cycle complete");
                    }
                    Ok(_) => {}
                    Err(err) => error!(
                        error = %err,
                        "replacement suggestion cycle failed; next cycle will retry"
                    ),
                }
            }
            _ = shutdown.changed() => {
                info!("replacement suggestion loop stopping");
                break;
            }
        }
    }
}
