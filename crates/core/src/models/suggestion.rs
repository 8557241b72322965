use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One ranked replacement candidate for a leave request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub driver_id: Uuid,
    pub vehicle_id: Uuid,
    pub score: f64,
    pub reason: String,
}

/// Result of a suggestion pass. `NoCandidates` is a definitive outcome — the
/// pool was empty after filtering — as opposed to a transient failure, which
/// surfaces as an error and is retried on the next cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SuggestionOutcome {
    Ranked(Vec<Suggestion>),
    NoCandidates,
}

impl SuggestionOutcome {
    pub fn best(&self) -> Option<&Suggestion> {
        match self {
            SuggestionOutcome::Ranked(suggestions) => suggestions.first(),
            SuggestionOutcome::NoCandidates => None,
        }
    }
}
