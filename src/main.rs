use anyhow::Result;
use tracing::error;

use fear_greed_index::app::server::Server;
use fear_greed_index::models::config::Config;
use fear_greed_index::services::api::FearGreedClient;
use fear_greed_index::services::logger;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::from_env();
    logger::init(&config)?;

    // Serve until the host closes stdin
    let server = Server::new(config, FearGreedClient::new());
    if let Err(err) = server.serve_stdio().await {
        error!(error = ?err, "server error");
        return Err(err);
    }

    Ok(())
}
