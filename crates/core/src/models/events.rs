use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::trip::TripGenerationSummary;

/// Fire-and-forget notification events emitted by the background loops. The
/// core never waits for delivery confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NotificationEvent {
    SuggestionFound {
        leave_request_id: Uuid,
        driver_id: Uuid,
        vehicle_id: Uuid,
        score: f64,
    },
    NoSuggestionAvailable {
        leave_request_id: Uuid,
    },
    TripGenerationSummary(TripGenerationSummary),
}
