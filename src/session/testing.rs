use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use geo_types::Rect;

use crate::{
    api::{DirectionsService, LocationProvider, MapRenderer},
    entities::{Coordinates, Leg, RouteRequest, RouteResult, WaypointId},
    error::{route_computation_error, Error},
};

pub fn at(lat: f64, lng: f64) -> Coordinates {
    Coordinates::new(lat, lng).unwrap()
}

#[derive(Default)]
pub struct RecordingMap {
    markers: Vec<(WaypointId, Coordinates, String)>,
    routes_drawn: usize,
    route_visible: bool,
    bounds: Option<Rect<f64>>,
    center: Option<Coordinates>,
    distance: Option<f64>,
}

impl RecordingMap {
    pub fn has_marker(&self, id: WaypointId) -> bool {
        self.markers.iter().any(|(marker, _, _)| *marker == id)
    }

    pub fn titles(&self) -> Vec<&str> {
        self.markers.iter().map(|(_, _, title)| title.as_str()).collect()
    }

    pub fn routes_drawn(&self) -> usize {
        self.routes_drawn
    }

    pub fn route_visible(&self) -> bool {
        self.route_visible
    }

    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.bounds
    }

    pub fn center(&self) -> Option<Coordinates> {
        self.center
    }

    pub fn distance(&self) -> Option<f64> {
        self.distance
    }
}

impl MapRenderer for RecordingMap {
    fn place_marker(&mut self, id: WaypointId, coordinates: Coordinates, title: &str, _: bool) {
        self.markers.push((id, coordinates, title.into()));
    }

    fn remove_marker(&mut self, id: WaypointId) {
        self.markers.retain(|(marker, _, _)| *marker != id);
    }

    fn set_marker_title(&mut self, id: WaypointId, title: &str) {
        for (marker, _, current) in self.markers.iter_mut() {
            if *marker == id {
                *current = title.into();
            }
        }
    }

    fn draw_route(&mut self, _: &RouteResult) {
        self.routes_drawn += 1;
        self.route_visible = true;
    }

    fn clear_route(&mut self) {
        self.route_visible = false;
    }

    fn fit_bounds(&mut self, bounds: Rect<f64>) {
        self.bounds = Some(bounds);
    }

    fn set_center(&mut self, coordinates: Coordinates) {
        self.center = Some(coordinates);
    }

    fn show_distance(&mut self, km: Option<f64>) {
        self.distance = km;
    }
}

/// Answers with one 1 km leg per hop. Requests through `fail_at` points fail,
/// requests through `hang_at` points never finish in test time unless a
/// failure has already been served.
#[derive(Default)]
pub struct ScriptedDirections {
    fail_at: Option<usize>,
    hang_at: Option<usize>,
    failed: AtomicBool,
    calls: AtomicUsize,
}

impl ScriptedDirections {
    pub fn failing_at(points: usize) -> Self {
        Self {
            fail_at: Some(points),
            ..Self::default()
        }
    }

    pub fn hanging_at(points: usize) -> Self {
        Self {
            hang_at: Some(points),
            ..Self::default()
        }
    }

    pub fn with_failure_at(mut self, points: usize) -> Self {
        self.fail_at = Some(points);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DirectionsService for ScriptedDirections {
    async fn route(&self, request: RouteRequest) -> Result<RouteResult, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut points = vec![request.origin];
        points.extend(request.waypoints);
        points.push(request.destination);

        if self.hang_at == Some(points.len()) && !self.failed.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }

        if self.fail_at == Some(points.len()) {
            self.failed.store(true, Ordering::SeqCst);
            return Err(route_computation_error());
        }

        let legs = points
            .windows(2)
            .map(|hop| Leg {
                distance: 1000.0,
                end: hop[1],
            })
            .collect();

        Ok(RouteResult::new(legs))
    }
}

pub struct FixedLocation(pub Result<Coordinates, Error>);

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_location(&self) -> Result<Coordinates, Error> {
        self.0.clone()
    }
}
