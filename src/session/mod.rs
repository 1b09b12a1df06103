//! Waypoint bookkeeping for a single map page.
//!
//! A [`Session`] owns the ordered waypoints and keeps three things in step with
//! them: the markers on the map, the hidden form fields and the drawn route.
//! Every mutation bumps the session revision. Route requests are handed out as
//! [`RouteTicket`]s stamped with that revision, and a completed request is only
//! applied if no mutation happened in between.

mod events;
#[cfg(test)]
mod testing;

pub use events::MapEvent;

use geo_types::{Coord, Rect};

use crate::{
    api::{DynDirections, DynLocation, FormMirror, MapRenderer},
    entities::{
        compute_aggregate_distance, marker_title, Coordinates, RouteRequest, RouteResult,
        TravelMode, Waypoint, WaypointId,
    },
    error::{invalid_input_error, Error},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteState {
    /// Fewer than two waypoints, nothing to route.
    Empty,
    Routed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TicketCause {
    Appended(WaypointId),
    Moved(WaypointId),
    Removed,
    Restored,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RouteTicket {
    pub revision: u64,
    pub cause: TicketCause,
    pub request: RouteRequest,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RouteOutcome {
    Drawn { km: f64 },
    /// The waypoint appended by the ticket was discarded. The restored list
    /// needs the carried ticket routed, `None` when it is too short to route.
    RolledBack(Option<RouteTicket>),
    /// The request failed but there was nothing to undo.
    Unreconciled,
    /// A newer mutation superseded the ticket.
    Stale,
}

pub struct Session<M, F> {
    map: M,
    mirror: F,
    waypoints: Vec<Waypoint>,
    revision: u64,
    travel_mode: TravelMode,
    directions: DynDirections,
    location: Option<DynLocation>,
}

impl<M, F> Session<M, F>
where
    M: MapRenderer,
    F: FormMirror,
{
    pub fn new(map: M, mirror: F, directions: DynDirections) -> Self {
        Self {
            map,
            mirror,
            waypoints: vec![],
            revision: 0,
            travel_mode: TravelMode::default(),
            directions,
            location: None,
        }
    }

    pub fn with_location(mut self, location: DynLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_travel_mode(mut self, travel_mode: TravelMode) -> Self {
        self.travel_mode = travel_mode;
        self
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn mirror(&self) -> &F {
        &self.mirror
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn coordinates(&self) -> Vec<Coordinates> {
        self.waypoints.iter().map(|w| w.coordinates).collect()
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn state(&self) -> RouteState {
        match self.waypoints.len() {
            0 | 1 => RouteState::Empty,
            _ => RouteState::Routed,
        }
    }

    pub fn index_of(&self, id: WaypointId) -> Option<usize> {
        self.waypoints.iter().position(|w| w.id == id)
    }

    #[tracing::instrument(skip(self))]
    pub fn append(&mut self, point: Coordinates) -> Result<Option<RouteTicket>, Error> {
        if !point.is_valid() {
            return Err(invalid_input_error());
        }

        let id = self.push(point);

        Ok(self.issue_ticket(TicketCause::Appended(id)))
    }

    /// Appends a batch of saved points and routes them with a single request.
    #[tracing::instrument(skip(self, points))]
    pub fn restore(&mut self, points: &[Coordinates]) -> Result<Option<RouteTicket>, Error> {
        if points.iter().any(|p| !p.is_valid()) {
            return Err(invalid_input_error());
        }

        for point in points {
            self.push(*point);
        }

        tracing::info!("restored {} waypoints", points.len());
        self.fit_bounds();

        Ok(self.issue_ticket(TicketCause::Restored))
    }

    #[tracing::instrument(skip(self))]
    pub fn remove(&mut self, index: usize) -> Result<Option<RouteTicket>, Error> {
        if index >= self.waypoints.len() {
            return Err(invalid_input_error());
        }

        let removed = self.waypoints.remove(index);
        self.map.remove_marker(removed.id);

        for (position, waypoint) in self.waypoints.iter().enumerate().skip(index) {
            self.mirror.write(position, &waypoint.coordinates.to_string());
            self.map.set_marker_title(waypoint.id, &marker_title(position));
        }

        // the old last index has no waypoint anymore
        self.mirror.remove(self.waypoints.len());

        Ok(self.issue_ticket(TicketCause::Removed))
    }

    pub fn remove_waypoint(&mut self, id: WaypointId) -> Result<Option<RouteTicket>, Error> {
        let index = self.index_of(id).ok_or_else(invalid_input_error)?;

        self.remove(index)
    }

    #[tracing::instrument(skip(self))]
    pub fn move_waypoint(
        &mut self,
        id: WaypointId,
        point: Coordinates,
    ) -> Result<Option<RouteTicket>, Error> {
        if !point.is_valid() {
            return Err(invalid_input_error());
        }

        let index = self.index_of(id).ok_or_else(invalid_input_error)?;

        self.waypoints[index].coordinates = point;
        self.mirror.write(index, &point.to_string());

        Ok(self.issue_ticket(TicketCause::Moved(id)))
    }

    /// Reconciles a finished route request with the current waypoints.
    #[tracing::instrument(skip(self, ticket, result), fields(revision = ticket.revision))]
    pub fn apply_route(
        &mut self,
        ticket: RouteTicket,
        result: Result<RouteResult, Error>,
    ) -> RouteOutcome {
        if ticket.revision != self.revision {
            tracing::debug!("dropping route for revision {}", ticket.revision);
            return RouteOutcome::Stale;
        }

        match result {
            Ok(route) => {
                let km = compute_aggregate_distance(&route);

                self.map.draw_route(&route);
                self.map.show_distance(Some(km));

                RouteOutcome::Drawn { km }
            }
            Err(err) => match ticket.cause {
                TicketCause::Appended(id) if self.waypoints.last().map(|w| w.id) == Some(id) => {
                    tracing::info!("route failed ({}), discarding waypoint {}", err, id);

                    self.waypoints.pop();
                    self.mirror.remove(self.waypoints.len());
                    self.map.remove_marker(id);

                    // earlier tickets for this list may have been superseded
                    RouteOutcome::RolledBack(self.issue_ticket(TicketCause::Restored))
                }
                cause => {
                    tracing::warn!("route failed ({}) after {:?}", err, cause);
                    RouteOutcome::Unreconciled
                }
            },
        }
    }

    /// Runs the ticket's request inline and applies the result.
    pub async fn compute_route(&mut self, ticket: RouteTicket) -> RouteOutcome {
        let result = self.directions.route(ticket.request.clone()).await;

        self.apply_route(ticket, result)
    }

    /// Best effort: without a location capability, or when it fails, the map
    /// stays where it is.
    #[tracing::instrument(skip(self))]
    pub async fn recenter_on_current_location(&mut self) {
        let location = match &self.location {
            Some(location) => location.clone(),
            None => return,
        };

        let result = location.current_location().await;
        self.center_on(result);
    }

    pub fn fit_bounds(&mut self) {
        let mut points = self.waypoints.iter().map(|w| w.coordinates);

        let first = match points.next() {
            Some(first) => first,
            None => return,
        };

        let (mut min_lat, mut max_lat) = (first.latitude, first.latitude);
        let (mut min_lng, mut max_lng) = (first.longitude, first.longitude);

        for point in points {
            min_lat = min_lat.min(point.latitude);
            max_lat = max_lat.max(point.latitude);
            min_lng = min_lng.min(point.longitude);
            max_lng = max_lng.max(point.longitude);
        }

        let min = Coordinates {
            latitude: min_lat,
            longitude: min_lng,
        };
        let max = Coordinates {
            latitude: max_lat,
            longitude: max_lng,
        };

        self.map.fit_bounds(Rect::new(Coord::from(min), Coord::from(max)));
    }

    fn center_on(&mut self, result: Result<Coordinates, Error>) {
        match result {
            Ok(coordinates) => self.map.set_center(coordinates),
            Err(err) => tracing::debug!("location unavailable: {}", err),
        }
    }

    fn push(&mut self, point: Coordinates) -> WaypointId {
        let waypoint = Waypoint::new(point);
        let index = self.waypoints.len();
        let id = waypoint.id;

        self.map.place_marker(id, point, &marker_title(index), true);
        self.mirror.write(index, &point.to_string());
        self.waypoints.push(waypoint);

        id
    }

    fn issue_ticket(&mut self, cause: TicketCause) -> Option<RouteTicket> {
        self.revision += 1;

        match RouteRequest::through(&self.coordinates(), self.travel_mode) {
            Some(request) => Some(RouteTicket {
                revision: self.revision,
                cause,
                request,
            }),
            None => {
                self.map.clear_route();
                self.map.show_distance(None);
                None
            }
        }
    }
}
