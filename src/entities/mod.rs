mod location;
mod route;
mod waypoint;

pub use location::Coordinates;
pub use route::{compute_aggregate_distance, Leg, RouteRequest, RouteResult, RouteSummary, TravelMode};
pub use waypoint::{marker_title, Waypoint, WaypointId};
