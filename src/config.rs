use std::env;
use std::net::SocketAddr;

use crate::{
    entities::TravelMode,
    error::{invalid_input_error, Error},
};

pub const DEFAULT_API_BASE: &str = "maps.googleapis.com";
pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[derive(Clone, Debug)]
pub struct Config {
    pub api_base: String,
    pub api_key: String,
    pub travel_mode: TravelMode,
    pub addr: SocketAddr,
}

impl Config {
    /// Reads the configuration from the environment, loading `.env` first if
    /// one exists.
    #[tracing::instrument(name = "Config::from_env")]
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();

        let api_key = env::var("GOOGLE_MAPS_API_KEY")?;

        Self::from_parts(
            api_key,
            env::var("GOOGLE_MAPS_API_BASE").ok(),
            env::var("WAYPOINTER_TRAVEL_MODE").ok(),
            env::var("WAYPOINTER_ADDR").ok(),
        )
    }

    fn from_parts(
        api_key: String,
        api_base: Option<String>,
        travel_mode: Option<String>,
        addr: Option<String>,
    ) -> Result<Self, Error> {
        let travel_mode = match travel_mode {
            Some(mode) => mode.parse()?,
            None => TravelMode::default(),
        };

        let addr = addr
            .as_deref()
            .unwrap_or(DEFAULT_ADDR)
            .parse()
            .map_err(|_| invalid_input_error())?;

        Ok(Self {
            api_base: api_base.unwrap_or_else(|| DEFAULT_API_BASE.into()),
            api_key,
            travel_mode,
            addr,
        })
    }
}
