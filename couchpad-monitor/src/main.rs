//! Couchpad Device Monitor - headless runner
//!
//! Loads the launcher settings, starts the device supervisor and logs the
//! action and connection streams. The widget layer embeds the same library;
//! this binary is what runs on a box without it, and doubles as a
//! diagnostic tool for checking button maps.

use couchpad_common::settings::Settings;
use couchpad_monitor::{ConnectionEvent, DeviceMonitor, EvdevSource, Registry};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    info!("Starting couchpad device monitor v{}", env!("CARGO_PKG_VERSION"));

    // Nothing can be monitored without the settings file; bail out early.
    let settings = Settings::load().await?;
    let registry = Registry::from_settings(&settings);
    if registry.is_empty() {
        warn!("no device mappings configured; the monitor will sit idle");
    } else {
        info!("{} allowed device(s) configured", registry.len());
    }

    let mut monitor = DeviceMonitor::new(registry, Arc::new(EvdevSource::new()));
    let mut actions = monitor.actions();
    let mut connections = monitor.connections();
    let shutdown = monitor.shutdown_handle();

    // Stand-ins for the focus-navigation and tray-icon handlers.
    tokio::spawn(async move {
        while let Some(action) = actions.recv().await {
            info!("action: {}", action);
        }
    });
    tokio::spawn(async move {
        while let Some(event) = connections.recv().await {
            match event {
                ConnectionEvent::Connected(name) => info!("tray: {} connected", name),
                ConnectionEvent::Disconnected(name) => info!("tray: {} disconnected", name),
            }
        }
    });

    let supervisor = tokio::spawn(async move { monitor.run().await });

    // Set up signal handlers for graceful shutdown
    let mut terminate = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
    let mut interrupt = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())?;

    tokio::select! {
        _ = terminate.recv() => {
            info!("Received SIGTERM, shutting down gracefully");
        }
        _ = interrupt.recv() => {
            info!("Received SIGINT, shutting down gracefully");
        }
    }

    shutdown.shutdown();
    supervisor.await?;

    info!("Couchpad device monitor shutdown complete");

    // Readers parked in a blocking device read cannot observe the shutdown
    // flag until their device produces an event; exit without waiting for
    // them instead of hanging on runtime teardown.
    std::process::exit(0)
}
