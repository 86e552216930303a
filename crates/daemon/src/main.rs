//! noticed - Main Entry Point
//! Polls a notification snapshot source and restarts the configured
//! executable when a new notification matches the keyword.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Import workspace crates
use noticed_core::application::{shutdown_channel, Listener, ListenerConfig, NoticeEvent};
use noticed_core::port::NotificationSource;
use noticed_infra_system::{JsonFileSource, SystemProcessControl};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_SOURCE_PATH: &str = "~/.noticed/notices.json";

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging
    let log_format = std::env::var("NOTICED_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("noticed=info"))
        .expect("Failed to create env filter");

    match log_format.as_str() {
        "json" => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            // Development: Pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    info!("noticed v{} starting...", VERSION);

    // 2. Load configuration (explicit inputs, no ambient lookup past this point)
    let keyword = std::env::var("NOTICED_KEYWORD")
        .map_err(|_| anyhow::anyhow!("NOTICED_KEYWORD must be set"))?;
    let app_location = std::env::var("NOTICED_APP_LOCATION")
        .map_err(|_| anyhow::anyhow!("NOTICED_APP_LOCATION must be set"))?;
    let source_path = std::env::var("NOTICED_SOURCE_PATH")
        .unwrap_or_else(|_| shellexpand::tilde(DEFAULT_SOURCE_PATH).into_owned());

    // 3. Setup dependencies (DI wiring)
    let source = Arc::new(JsonFileSource::new(&source_path));
    let process = Arc::new(SystemProcessControl::new());

    // 4. Startup capability check - fatal before the loop ever starts
    source
        .request_access()
        .await
        .map_err(|e| anyhow::anyhow!("Notification source unavailable: {e}"))?;

    info!(
        source_path = %source_path,
        app_location = %app_location,
        "Notification source ready"
    );

    // 5. Start the listener loop
    let config = ListenerConfig::new(keyword, app_location);
    let mut listener = Listener::new(config, source, process);
    let view = listener.view();

    let (shutdown_tx, shutdown_rx) = shutdown_channel();

    let listener_handle = tokio::spawn(async move {
        if let Err(e) = listener.run(shutdown_rx).await {
            tracing::error!(error = %e, "Listener failed");
        }
    });

    // 6. Log the change feed (the observable view a UI would consume)
    tokio::spawn(async move {
        let mut events = view.subscribe();
        while let Ok(event) = events.recv().await {
            match event {
                NoticeEvent::Added(n) => info!(id = n.id, title = %n.title, "Notification added"),
                NoticeEvent::Removed(id) => info!(id = id, "Notification removed"),
            }
        }
    });

    info!("Listening. Press Ctrl+C to shutdown");

    // 7. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 8. Graceful shutdown: signal only; the managed process is left running
    shutdown_tx.shutdown();
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), listener_handle).await;

    info!("Shutdown complete.");

    Ok(())
}
