use std::sync::Arc;

use waypointer::config::Config;
use waypointer::engine::Engine;
use waypointer::error::Error;
use waypointer::external::google_maps::GoogleDirections;
use waypointer::server::serve;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let directions = Arc::new(GoogleDirections::from_config(&config));

    let engine = Engine::new(directions, config.travel_mode);

    serve(engine, config.addr).await
}
