use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fleetops_core::errors::OpsResult;
use fleetops_core::models::assignment::{PrincipalKind, ResourceAssignment};
use uuid::Uuid;

#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// Persists a new assignment. For an open-ended Approved primary this
    /// atomically verifies the per-vehicle uniqueness invariant and fails
    /// with a conflict rather than replacing the existing one. (Freshly
    /// requested assignments are Pending, so in practice the check bites on
    /// approval — but the store guards the insert path too.)
    async fn insert_assignment(
        &self,
        assignment: ResourceAssignment,
    ) -> OpsResult<ResourceAssignment>;

    async fn get_assignment_by_id(&self, id: Uuid) -> OpsResult<Option<ResourceAssignment>>;

    /// Pending → Approved, re-verifying the open-ended-primary invariant
    /// under the same lock that publishes the new status.
    async fn approve_assignment(&self, id: Uuid) -> OpsResult<ResourceAssignment>;

    /// Pending → Rejected with a reason.
    async fn reject_assignment(&self, id: Uuid, reason: &str) -> OpsResult<ResourceAssignment>;

    /// Approved → Cancelled with a reason; frees the vehicle's primary slot.
    async fn cancel_assignment(&self, id: Uuid, reason: &str) -> OpsResult<ResourceAssignment>;

    /// Assignments for the vehicle whose window overlaps `[start, end)`;
    /// `end = None` queries an open-ended range.
    async fn list_assignments_for_vehicle_between(
        &self,
        vehicle_id: Uuid,
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
    ) -> OpsResult<Vec<ResourceAssignment>>;

    /// Assignments held by the principal whose window overlaps
    /// `[start, end)`.
    async fn list_assignments_for_principal_between(
        &self,
        principal: PrincipalKind,
        principal_id: Uuid,
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
    ) -> OpsResult<Vec<ResourceAssignment>>;
}
