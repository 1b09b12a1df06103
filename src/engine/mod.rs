mod route_api;

use crate::{
    api::{DynDirections, API},
    entities::TravelMode,
};

pub struct Engine {
    directions: DynDirections,
    travel_mode: TravelMode,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip(directions))]
    pub fn new(directions: DynDirections, travel_mode: TravelMode) -> Self {
        Self {
            directions,
            travel_mode,
        }
    }
}

impl API for Engine {}
