use async_channel::{Receiver, Sender};
use tokio::task::JoinHandle;

use super::{RouteOutcome, RouteTicket, Session};
use crate::{
    api::{FormMirror, MapRenderer},
    entities::{Coordinates, RouteResult, WaypointId},
    error::Error,
};

#[derive(Clone, Debug, PartialEq)]
pub enum MapEvent {
    Clicked(Coordinates),
    MarkerDragged {
        id: WaypointId,
        coordinates: Coordinates,
    },
    MarkerDeleteRequested {
        id: WaypointId,
    },
    RecenterRequested,
    FitBoundsRequested,
}

enum Action {
    Route(RouteTicket),
    Locate,
}

enum Completion {
    Route(RouteTicket, Result<RouteResult, Error>),
    Location(Result<Coordinates, Error>),
}

impl<M, F> Session<M, F>
where
    M: MapRenderer,
    F: FormMirror,
{
    /// Processes map events one at a time until the channel closes. Route and
    /// location requests run on their own tasks, a newer request aborts the
    /// previous one of the same kind.
    #[tracing::instrument(skip_all)]
    pub async fn run(&mut self, events: Receiver<MapEvent>) {
        let (tx, completions) = async_channel::unbounded();

        let mut routing: Option<JoinHandle<()>> = None;
        let mut locating: Option<JoinHandle<()>> = None;

        tracing::info!("session started");

        loop {
            tokio::select! {
                event = events.recv() => {
                    let event = match event {
                        Ok(event) => event,
                        Err(_) => break,
                    };

                    match self.handle_event(event) {
                        Ok(Some(Action::Route(ticket))) => {
                            replace(&mut routing, self.spawn_route(ticket, tx.clone()));
                        }
                        Ok(Some(Action::Locate)) => {
                            if let Some(handle) = self.spawn_locate(tx.clone()) {
                                replace(&mut locating, handle);
                            }
                        }
                        Ok(None) => {}
                        Err(err) => tracing::warn!("ignoring map event: {}", err),
                    }
                }
                Ok(completion) = completions.recv() => {
                    if let Some(ticket) = self.complete(completion) {
                        replace(&mut routing, self.spawn_route(ticket, tx.clone()));
                    }
                }
            }
        }

        // let in-flight requests land before handing the session back, a
        // rollback may still ask for one more route
        loop {
            for handle in [routing.take(), locating.take()].into_iter().flatten() {
                if let Err(err) = handle.await {
                    tracing::warn!("request task failed: {}", err);
                }
            }

            let mut follow_up = None;
            while let Ok(completion) = completions.try_recv() {
                if let Some(ticket) = self.complete(completion) {
                    follow_up = Some(ticket);
                }
            }

            match follow_up {
                Some(ticket) => routing = Some(self.spawn_route(ticket, tx.clone())),
                None => break,
            }
        }

        tracing::info!("session stopped with {} waypoints", self.len());
    }

    fn handle_event(&mut self, event: MapEvent) -> Result<Option<Action>, Error> {
        let ticket = match event {
            MapEvent::Clicked(coordinates) => self.append(coordinates)?,
            MapEvent::MarkerDragged { id, coordinates } => self.move_waypoint(id, coordinates)?,
            MapEvent::MarkerDeleteRequested { id } => self.remove_waypoint(id)?,
            MapEvent::RecenterRequested => return Ok(Some(Action::Locate)),
            MapEvent::FitBoundsRequested => {
                self.fit_bounds();
                None
            }
        };

        Ok(ticket.map(Action::Route))
    }

    /// Applies a finished request, returning the route a rollback still needs.
    fn complete(&mut self, completion: Completion) -> Option<RouteTicket> {
        match completion {
            Completion::Route(ticket, result) => match self.apply_route(ticket, result) {
                RouteOutcome::RolledBack(follow_up) => follow_up,
                outcome => {
                    tracing::debug!("route completed: {:?}", outcome);
                    None
                }
            },
            Completion::Location(result) => {
                self.center_on(result);
                None
            }
        }
    }

    fn spawn_route(&self, ticket: RouteTicket, tx: Sender<Completion>) -> JoinHandle<()> {
        let directions = self.directions.clone();

        tokio::spawn(async move {
            let result = directions.route(ticket.request.clone()).await;
            // receiver lives as long as the loop
            let _ = tx.send(Completion::Route(ticket, result)).await;
        })
    }

    fn spawn_locate(&self, tx: Sender<Completion>) -> Option<JoinHandle<()>> {
        let location = self.location.clone()?;

        Some(tokio::spawn(async move {
            let result = location.current_location().await;
            let _ = tx.send(Completion::Location(result)).await;
        }))
    }
}

fn replace(slot: &mut Option<JoinHandle<()>>, handle: JoinHandle<()>) {
    if let Some(previous) = slot.replace(handle) {
        previous.abort();
    }
}
