//! Hi-Lo Game Server
//!
//! Binds the HTTP API over a flat-file profile store. Data directory and
//! port come from the environment (`DATA_DIR`, `PORT`).

use tracing::info;
use tracing_subscriber::EnvFilter;

use hilo::network::server::{run, ServerConfig};
use hilo::VERSION;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .init();

    let config = ServerConfig::from_env();

    info!("Hi-Lo Server v{}", VERSION);
    info!("Data directory: {}", config.data_dir.display());
    info!("Port: {}", config.port);

    run(config).await?;
    Ok(())
}
