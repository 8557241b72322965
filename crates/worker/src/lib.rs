//! # fleetops-worker
//!
//! The background orchestrators of the fleetops backend: two independent
//! timer loops that keep the trip horizon materialized and compute
//! replacement suggestions for pending leave requests, plus the outbound
//! notification channel they emit events on.
//!
//! Each loop owns nothing global: it receives its dependencies when spawned
//! and talks to storage through the same repository traits as the service
//! layer. A failure inside a cycle or a single batch item is logged and
//! skipped; the timers never stop until shutdown is signalled, and shutdown
//! is only observed between cycles so in-flight work completes.

pub mod config;
pub mod notifier;
pub mod replacement;
pub mod trip_generation;

use std::sync::Arc;

use fleetops_service::OpsState;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::WorkerConfig;
use crate::notifier::Notifier;

/// Spawns both worker loops. Flip the watch channel to `true` to stop them;
/// the returned handles resolve once each loop has wound down.
pub fn start_workers(
    state: Arc<OpsState>,
    notifier: Arc<dyn Notifier>,
    config: WorkerConfig,
    shutdown: watch::Receiver<bool>,
) -> Vec<JoinHandle<()>> {
    vec![
        tokio::spawn(trip_generation::run_trip_generation_loop(
            state.clone(),
            notifier.clone(),
            config.clone(),
            shutdown.clone(),
        )),
        tokio::spawn(replacement::run_replacement_loop(
            state,
            notifier,
            config,
            shutdown,
        )),
    ]
}
