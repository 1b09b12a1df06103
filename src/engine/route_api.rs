use super::Engine;

use async_trait::async_trait;

use crate::{
    api::RouteAPI,
    entities::{Coordinates, RouteRequest, RouteSummary},
    error::{invalid_input_error, route_computation_error, Error},
};

#[async_trait]
impl RouteAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn plan_route(&self, waypoints: Vec<Coordinates>) -> Result<RouteSummary, Error> {
        let request = RouteRequest::through(&waypoints, self.travel_mode).ok_or_else(|| {
            tracing::info!("at least two waypoints are required");
            invalid_input_error()
        })?;

        let route = self.directions.route(request).await?;

        if route.legs.is_empty() {
            return Err(route_computation_error());
        }

        Ok(RouteSummary::new(waypoints, route))
    }
}
