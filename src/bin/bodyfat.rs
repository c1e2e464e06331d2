//! Body-fat calculator server.
//!
//! Try: curl 'http://localhost:8080/?sex=M&height=180&neck=38&waist=85'

use fitrelay::prelude::*;
use fitrelay::runtime::init_tracing;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    init_tracing();

    let config = ServerConfig::from_env()?;
    tracing::info!("Starting body-fat calculator on {}", config.bind_addr());

    EdgeServer::new(config, BodyFatFunction::new()).run().await
}
