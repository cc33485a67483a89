//! Agrimarket storefront server
//!
//! This is the main entry point for the application.

use agrimarket::{
    config,
    web::{create_router, AppState},
};
use anyhow::Result;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter, filter_handle) = reload::Layer::new(filter);
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();

    info!("Starting Agrimarket v{}", agrimarket::VERSION);

    // Load configuration
    let (settings, source) = config::load()?;
    match &source {
        Some(path) => info!("Loaded settings from: {}", path.display()),
        None => info!("No settings file found, using defaults"),
    }

    if settings.general.debug && std::env::var_os(EnvFilter::DEFAULT_ENV).is_none() {
        filter_handle.reload(EnvFilter::new("debug"))?;
        info!("Debug logging enabled");
    }

    info!(
        "Serving {} with default language {}",
        settings.general.site_name, settings.i18n.default_lang
    );

    // Bind address
    let addr = SocketAddr::new(settings.server.bind_address.parse()?, settings.server.port);

    // Create application state
    let state = AppState::new(settings)?;
    info!("Application state initialized, public URL {}", state.base_url);

    // Create router
    let app = create_router(state);

    info!("Starting server on http://{}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
