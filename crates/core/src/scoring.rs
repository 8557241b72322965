//! Replacement-candidate scoring.
//!
//! The weighting of the individual signals is a policy decision, so the
//! scoring function is a trait the service is handed at construction time.
//! Candidates are ranked by descending score with ties broken by lowest
//! driver id, then lowest vehicle id, so identical pools always produce
//! identical orderings.

use chrono::Datelike;

use crate::models::directory::{Driver, Vehicle};
use crate::models::suggestion::Suggestion;
use crate::models::trip::Trip;

/// Everything a policy may look at for one candidate. `affected_trips` are
/// the trips inside the leave window the candidate would take over;
/// `assignments_nearby` counts the candidate's own assignments in the week
/// around the window.
pub struct ScoringContext<'a> {
    pub driver: &'a Driver,
    pub vehicle: &'a Vehicle,
    pub affected_trips: &'a [Trip],
    pub assignments_nearby: usize,
}

pub trait ScoringPolicy: Send + Sync {
    /// Higher is better. Implementations must be deterministic.
    fn score(&self, ctx: &ScoringContext<'_>) -> f64;
}

/// Weighted sum of three sub-scores, each in `[0, 1]`:
///
/// - working-hour fit: mean ratio of trip duration to the candidate's
///   working span on that weekday, preferring candidates whose day most
///   tightly matches the trips they would absorb;
/// - disruption: `1 / (1 + n)` over the candidate's nearby assignment count,
///   preferring candidates with the least existing commitment to reshuffle;
/// - vehicle compatibility: capacity against the affected trips' student
///   count, zero for an inactive vehicle.
#[derive(Debug, Clone, Copy)]
pub struct WeightedScoringPolicy {
    pub working_hours_weight: f64,
    pub disruption_weight: f64,
    pub vehicle_weight: f64,
}

impl Default for WeightedScoringPolicy {
    fn default() -> Self {
        Self {
            working_hours_weight: 1.0,
            disruption_weight: 1.0,
            vehicle_weight: 1.0,
        }
    }
}

impl WeightedScoringPolicy {
    fn working_hour_fit(&self, ctx: &ScoringContext<'_>) -> f64 {
        if ctx.affected_trips.is_empty() {
            return 1.0;
        }
        let mut total = 0.0;
        for trip in ctx.affected_trips {
            let trip_minutes = (trip.planned_end - trip.planned_start).num_minutes().max(0) as f64;
            let span_minutes = ctx
                .driver
                .working_span_minutes(trip.service_date.weekday())
                .unwrap_or(0)
                .max(0) as f64;
            if span_minutes > 0.0 {
                total += (trip_minutes / span_minutes).min(1.0);
            }
        }
        total / ctx.affected_trips.len() as f64
    }

    fn disruption(&self, ctx: &ScoringContext<'_>) -> f64 {
        1.0 / (1.0 + ctx.assignments_nearby as f64)
    }

    fn vehicle_compatibility(&self, ctx: &ScoringContext<'_>) -> f64 {
        if !ctx.vehicle.is_active {
            return 0.0;
        }
        let required = ctx
            .affected_trips
            .iter()
            .map(|trip| trip.student_ids().len())
            .max()
            .unwrap_or(0);
        if required == 0 {
            return 1.0;
        }
        (ctx.vehicle.capacity as f64 / required as f64).min(1.0)
    }
}

impl ScoringPolicy for WeightedScoringPolicy {
    fn score(&self, ctx: &ScoringContext<'_>) -> f64 {
        self.working_hours_weight * self.working_hour_fit(ctx)
            + self.disruption_weight * self.disruption(ctx)
            + self.vehicle_weight * self.vehicle_compatibility(ctx)
    }
}

/// Orders scored suggestions: descending score, then ascending driver id and
/// vehicle id for determinism.
pub fn rank_suggestions(mut suggestions: Vec<Suggestion>) -> Vec<Suggestion> {
    suggestions.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.driver_id.cmp(&b.driver_id))
            .then_with(|| a.vehicle_id.cmp(&b.vehicle_id))
    });
    suggestions
}
