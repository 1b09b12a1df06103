use std::sync::Arc;

use async_trait::async_trait;
use geo_types::Rect;

use crate::entities::{Coordinates, RouteRequest, RouteResult, RouteSummary, WaypointId};
use crate::error::Error;

/// Drawing surface of the hosting map.
pub trait MapRenderer {
    fn place_marker(
        &mut self,
        id: WaypointId,
        coordinates: Coordinates,
        title: &str,
        draggable: bool,
    );
    fn remove_marker(&mut self, id: WaypointId);
    fn set_marker_title(&mut self, id: WaypointId, title: &str);

    fn draw_route(&mut self, route: &RouteResult);
    fn clear_route(&mut self);

    fn fit_bounds(&mut self, bounds: Rect<f64>);
    fn set_center(&mut self, coordinates: Coordinates);

    /// Total route length label, `None` hides it.
    fn show_distance(&mut self, km: Option<f64>);
}

/// Hidden, submittable fields keyed by waypoint index.
pub trait FormMirror {
    /// Creates the field at `index` if absent, otherwise overwrites it.
    fn write(&mut self, index: usize, value: &str);
    fn remove(&mut self, index: usize);
}

#[async_trait]
pub trait DirectionsService {
    async fn route(&self, request: RouteRequest) -> Result<RouteResult, Error>;
}

#[async_trait]
pub trait LocationProvider {
    async fn current_location(&self) -> Result<Coordinates, Error>;
}

#[async_trait]
pub trait RouteAPI {
    async fn plan_route(&self, waypoints: Vec<Coordinates>) -> Result<RouteSummary, Error>;
}

pub trait API: RouteAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
pub type DynDirections = Arc<dyn DirectionsService + Send + Sync>;
pub type DynLocation = Arc<dyn LocationProvider + Send + Sync>;
