use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    api::DirectionsService,
    config::Config,
    entities::{Coordinates, Leg, RouteRequest, RouteResult},
    error::{invalid_input_error, route_computation_error, upstream_error, Error},
};

#[derive(Clone, Debug, Serialize, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Distance {
    value: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct DirectionsLeg {
    distance: Distance,
    end_location: LatLng,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct DirectionsRoute {
    legs: Vec<DirectionsLeg>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Response {
    status: String,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Clone, Debug)]
pub struct GoogleDirections {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl GoogleDirections {
    pub fn new(api_base: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base,
            api_key,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_base.clone(), config.api_key.clone())
    }
}

#[async_trait]
impl DirectionsService for GoogleDirections {
    #[tracing::instrument(skip(self))]
    async fn route(&self, request: RouteRequest) -> Result<RouteResult, Error> {
        let url = format!("https://{}/maps/api/directions/json", self.api_base);

        let res = self
            .client
            .get(url)
            .query(&query_params(&request))
            .query(&[("key", &self.api_key)])
            .send()
            .await?;

        let status_code = res.status().as_u16();

        if (400..500).contains(&status_code) {
            return Err(invalid_input_error());
        } else if status_code != 200 {
            return Err(upstream_error());
        }

        let data: Response = res.json().await?;

        into_route(data)
    }
}

fn query_params(request: &RouteRequest) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("origin", request.origin.to_query()),
        ("destination", request.destination.to_query()),
        ("mode", request.travel_mode.name().to_string()),
    ];

    if !request.waypoints.is_empty() {
        let mut waypoints: Vec<String> = request.waypoints.iter().map(|w| w.to_query()).collect();

        if request.optimize {
            waypoints.insert(0, "optimize:true".into());
        }

        params.push(("waypoints", waypoints.join("|")));
    }

    params
}

fn into_route(data: Response) -> Result<RouteResult, Error> {
    match data.status.as_str() {
        "OK" => {}
        "ZERO_RESULTS" | "NOT_FOUND" => {
            tracing::info!("directions status {}", data.status);
            return Err(route_computation_error());
        }
        status => {
            tracing::warn!("unexpected directions status {}", status);
            return Err(upstream_error());
        }
    }

    let route = data
        .routes
        .into_iter()
        .next()
        .ok_or_else(route_computation_error)?;

    let legs = route
        .legs
        .into_iter()
        .map(|leg| {
            Ok(Leg {
                distance: leg.distance.value,
                end: Coordinates::new(leg.end_location.lat, leg.end_location.lng)
                    .map_err(|_| upstream_error())?,
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    Ok(RouteResult::new(legs))
}
