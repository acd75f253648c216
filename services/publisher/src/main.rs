use std::sync::Arc;

use anyhow::Result;
use common::graph::GraphClient;
use publisher::{
    AppState, config::ServiceConfig, create_router, schedule::SystemClock,
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting publisher service");

    let config = ServiceConfig::from_env()?;
    config.validate().map_err(anyhow::Error::msg)?;

    // Initialize the Graph API client
    let graph = GraphClient::new(config.graph.clone())?;

    let app_state = AppState::new(
        Arc::new(graph),
        Arc::new(SystemClock),
        config.max_upload_bytes,
    );

    // Start the web server
    let app = create_router(app_state);

    let address = config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("Publisher service listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
