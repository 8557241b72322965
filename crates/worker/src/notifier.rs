use std::sync::Arc;

use async_trait::async_trait;
use fleetops_core::errors::OpsResult;
use fleetops_core::models::events::NotificationEvent;
use tracing::{info, warn};

/// Outbound notification channel. Implementations deliver to whatever the
/// deployment uses (push, SMS gateway, message bus); the worker never waits
/// on them.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, event: NotificationEvent) -> OpsResult<()>;
}

/// Fire-and-forget dispatch: delivery runs on its own task and a failure is
/// logged, never propagated. Events for different recipients are independent,
/// so concurrent dispatches are fine.
pub fn dispatch(notifier: Arc<dyn Notifier>, event: NotificationEvent) {
    tokio::spawn(async move {
        if let Err(err) = notifier.notify(event).await {
            warn!(error = %err, "notification delivery failed");
        }
    });
}

/// Notifier that logs events instead of delivering them; the default wiring
/// until a real channel is plugged in.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify(&self, event: NotificationEvent) -> OpsResult<()> {
        match &event {
            NotificationEvent::SuggestionFound {
                leave_request_id,
                driver_id,
                vehicle_id,
                score,
            } => info!(
                %leave_request_id, %driver_id, %vehicle_id, score,
                "replacement suggestion found"
            ),
            NotificationEvent::NoSuggestionAvailable { leave_request_id } => info!(
                %leave_request_id,
                "no replacement suggestion available"
            ),
            NotificationEvent::TripGenerationSummary(summary) => info!(
                schedules_processed = summary.schedules_processed,
                trips_generated = summary.trips_generated,
                "trip generation summary"
            ),
        }
        Ok(())
    }
}
