use async_trait::async_trait;
use fleetops_core::errors::OpsResult;
use fleetops_core::models::route::Route;
use uuid::Uuid;

#[async_trait]
pub trait RouteRepository: Send + Sync {
    async fn create_route(&self, route: Route) -> OpsResult<Route>;

    async fn get_route_by_id(&self, id: Uuid) -> OpsResult<Option<Route>>;
}
