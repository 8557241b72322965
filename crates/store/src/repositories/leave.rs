use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use fleetops_core::errors::OpsResult;
use fleetops_core::models::leave::{LeaveRequest, LeaveStatus};
use uuid::Uuid;

#[async_trait]
pub trait LeaveRepository: Send + Sync {
    async fn create_leave_request(&self, request: LeaveRequest) -> OpsResult<LeaveRequest>;

    async fn get_leave_request_by_id(&self, id: Uuid) -> OpsResult<Option<LeaveRequest>>;

    async fn set_leave_status(&self, id: Uuid, status: LeaveStatus) -> OpsResult<LeaveRequest>;

    /// The replacement loop's batched selection: Pending requests with
    /// auto-replacement enabled whose suggestion marker is missing or older
    /// than `freshness`, oldest first, at most `limit`.
    async fn list_pending_needing_suggestion(
        &self,
        now: DateTime<Utc>,
        freshness: Duration,
        limit: usize,
    ) -> OpsResult<Vec<LeaveRequest>>;

    /// Writes the cached suggestion onto the request and stamps
    /// `suggestion_generated_at`. A no-candidate pass stores `None`s with a
    /// fresh stamp so the loop does not reprocess the request immediately.
    async fn cache_suggestion(
        &self,
        id: Uuid,
        driver_id: Option<Uuid>,
        vehicle_id: Option<Uuid>,
        generated_at: DateTime<Utc>,
    ) -> OpsResult<LeaveRequest>;

    /// Approved leaves for `driver_id` intersecting the inclusive date range.
    async fn list_approved_leaves_for_driver_between(
        &self,
        driver_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> OpsResult<Vec<LeaveRequest>>;
}
