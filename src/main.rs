use std::sync::Arc;

use binge_api::{config::Config, create_router, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("binge_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    // Without a catalog there is nothing to serve
    let state = AppState::from_config(&config)?;

    let app = create_router(Arc::new(state));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
