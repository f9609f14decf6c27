//! treetag-web - tree-tagging web service
//!
//! Volunteers tag, photograph and publish tree records; the public scans a
//! QR code to read them. Records live in a remote document store, images on
//! a remote media host.

use anyhow::Result;
use tracing::info;
use treetag_common::config::Config;
use treetag_web::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting treetag-web v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    info!("Document store: {}", config.store_url);
    let bind = config.bind.clone();

    let state = AppState::new(config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!("treetag-web listening on http://{bind}");
    info!("Health check: http://{bind}/health");

    axum::serve(listener, app).await?;

    Ok(())
}
