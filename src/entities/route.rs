use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;
use crate::error::{invalid_input_error, Error};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    #[default]
    Bicycling,
    Driving,
    Walking,
    Transit,
}

impl TravelMode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bicycling => "bicycling",
            Self::Driving => "driving",
            Self::Walking => "walking",
            Self::Transit => "transit",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TravelMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bicycling" => Ok(Self::Bicycling),
            "driving" => Ok(Self::Driving),
            "walking" => Ok(Self::Walking),
            "transit" => Ok(Self::Transit),
            _ => Err(invalid_input_error()),
        }
    }
}

/// Origin, via-points and destination, routed in the given order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub origin: Coordinates,
    pub destination: Coordinates,
    pub waypoints: Vec<Coordinates>,
    pub travel_mode: TravelMode,
    pub optimize: bool,
}

impl RouteRequest {
    /// Returns `None` when fewer than two points are given.
    pub fn through(points: &[Coordinates], travel_mode: TravelMode) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }

        let origin = points[0];
        let destination = points[points.len() - 1];

        Some(Self {
            origin,
            destination,
            waypoints: points[1..points.len() - 1].to_vec(),
            travel_mode,
            optimize: false,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    /// Meters.
    pub distance: f64,
    pub end: Coordinates,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    pub legs: Vec<Leg>,
}

impl RouteResult {
    pub fn new(legs: Vec<Leg>) -> Self {
        Self { legs }
    }

    pub fn total_distance_km(&self) -> f64 {
        compute_aggregate_distance(self)
    }
}

/// Total route length in kilometers. Legs are summed in meters and divided
/// once at the end so rounding happens a single time.
pub fn compute_aggregate_distance(route: &RouteResult) -> f64 {
    let meters: f64 = route.legs.iter().map(|leg| leg.distance).sum();

    meters / 1000.0
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub waypoints: Vec<Coordinates>,
    pub legs: Vec<Leg>,
    pub total_distance_km: f64,
}

impl RouteSummary {
    pub fn new(waypoints: Vec<Coordinates>, route: RouteResult) -> Self {
        let total_distance_km = compute_aggregate_distance(&route);

        Self {
            waypoints,
            legs: route.legs,
            total_distance_km,
        }
    }
}
