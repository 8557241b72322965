use eyre::Result;
use std::env;
use std::time::Duration;

/// Configuration for the background worker loops.
///
/// Every value has a default; the environment only needs to override what a
/// deployment wants changed.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Seconds between trip-generation cycles (defaults to 6 hours)
    pub trip_generation_period_secs: u64,
    /// Rolling horizon the generator materializes, in days (defaults to 7)
    pub trip_horizon_days: i64,
    /// Seconds between replacement-suggestion cycles (defaults to 30 minutes)
    pub suggestion_period_secs: u64,
    /// How many leave requests one suggestion cycle processes (defaults to 3)
    pub suggestion_batch_size: usize,
    /// Delay between items within a suggestion cycle, in milliseconds
    pub suggestion_item_delay_ms: u64,
    /// Seconds a cached suggestion stays fresh before it is recomputed
    /// (defaults to 2 hours)
    pub suggestion_freshness_secs: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            trip_generation_period_secs: 21_600,
            trip_horizon_days: 7,
            suggestion_period_secs: 1_800,
            suggestion_batch_size: 3,
            suggestion_item_delay_ms: 500,
            suggestion_freshness_secs: 7_200,
        }
    }
}

impl WorkerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let trip_generation_period_secs = env::var("TRIP_GENERATION_PERIOD_SECS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(defaults.trip_generation_period_secs);

        let trip_horizon_days = env::var("TRIP_HORIZON_DAYS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(defaults.trip_horizon_days);

        let suggestion_period_secs = env::var("SUGGESTION_PERIOD_SECS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(defaults.suggestion_period_secs);

        let suggestion_batch_size = env::var("SUGGESTION_BATCH_SIZE")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(defaults.suggestion_batch_size);

        let suggestion_item_delay_ms = env::var("SUGGESTION_ITEM_DELAY_MS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(defaults.suggestion_item_delay_ms);

        let suggestion_freshness_secs = env::var("SUGGESTION_FRESHNESS_SECS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(defaults.suggestion_freshness_secs);

        Ok(Self {
            trip_generation_period_secs,
            trip_horizon_days,
            suggestion_period_secs,
            suggestion_batch_size,
            suggestion_item_delay_ms,
            suggestion_freshness_secs,
        })
    }

    pub fn trip_generation_period(&self) -> Duration {
        Duration::from_secs(self.trip_generation_period_secs)
    }

    pub fn suggestion_period(&self) -> Duration {
        Duration::from_secs(self.suggestion_period_secs)
    }

    pub fn suggestion_item_delay(&self) -> Duration {
        Duration::from_millis(self.suggestion_item_delay_ms)
    }

    pub fn suggestion_freshness(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.suggestion_freshness_secs as i64)
    }
}
