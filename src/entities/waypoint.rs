use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::Coordinates;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WaypointId(Uuid);

impl WaypointId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WaypointId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WaypointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: WaypointId,
    pub coordinates: Coordinates,
}

impl Waypoint {
    pub fn new(coordinates: Coordinates) -> Self {
        Self {
            id: WaypointId::new(),
            coordinates,
        }
    }
}

/// Marker title shown on the map for the waypoint at `index`.
pub fn marker_title(index: usize) -> String {
    format!("#{}", index)
}
