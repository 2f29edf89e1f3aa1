//! Storefront Proxy - Main Entry Point
//! REST front for the ERP catalog, categories and lead capture

mod config;
mod telemetry;

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

// Import workspace crates
use storefront_api_http::{AppState, HttpServer, HttpServerConfig};
use storefront_core::application::{CacheStore, CatalogService, ContactService};
use storefront_core::port::time_provider::SystemTimeProvider;
use storefront_infra_odoo::{OdooClient, OdooConfig};

use crate::config::Settings;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging (and OpenTelemetry when enabled)
    telemetry::init()?;

    info!("Storefront Proxy v{} starting...", VERSION);

    // 2. Load configuration
    let settings = Settings::load()?;
    info!(
        odoo_url = %settings.odoo_url,
        database = %settings.odoo_database,
        "Configuration loaded"
    );

    // 3. Setup dependencies (DI wiring)
    let time_provider = Arc::new(SystemTimeProvider);
    let odoo_config = OdooConfig::new(
        settings.odoo_url.clone(),
        settings.odoo_database.clone(),
        settings.odoo_api_key.clone(),
    );
    let gateway = Arc::new(OdooClient::new(odoo_config, time_provider.clone()));
    let cache = Arc::new(CacheStore::new(time_provider.clone()));

    let catalog = Arc::new(CatalogService::new(
        gateway.clone(),
        cache,
        settings.odoo_url.clone(),
    ));
    let contact = Arc::new(ContactService::new(gateway));
    let state = AppState::new(catalog, contact, time_provider);

    // 4. Start HTTP server
    let http_config = HttpServerConfig {
        host: settings.host.clone(),
        port: settings.port,
    };
    let handle = HttpServer::new(http_config, state)
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server start failed: {}", e))?;

    info!(addr = %handle.local_addr(), "✅ Storefront API ready");
    info!("Press Ctrl+C to shutdown");

    // 5. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 6. Graceful shutdown
    handle
        .stop()
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server stop failed: {}", e))?;

    info!("Shutdown complete.");

    Ok(())
}
