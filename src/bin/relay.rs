//! Relay server: answers every request with the configured upstream's response.

use fitrelay::prelude::*;
use fitrelay::runtime::init_tracing;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    init_tracing();

    let server_config = ServerConfig::from_env()?;
    let relay_config = RelayConfig::from_env()?;

    tracing::info!(
        "Relaying {} (User-Agent: {:?}, invalid JSON: {:?})",
        relay_config.upstream_url,
        relay_config.user_agent,
        relay_config.invalid_json
    );

    let relay = RelayFunction::from_config(relay_config)?;
    EdgeServer::new(server_config, relay).run().await
}
