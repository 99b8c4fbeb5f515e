use anyhow::{Context, Result};
use contact_config::Config;
use contact_db::ConnectionManager;
use contact_service::{routes::build_router, state::AppState};
use std::sync::Arc;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    let config = Arc::new(config);

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("=== Contact Service Starting ===");
    info!("Port: {}", config.port);
    info!(
        "Database: {} at {}:{}",
        config.mysql_database, config.mysql_host, config.mysql_port
    );

    // Start the store connect cycle in the background; the service answers
    // 503 on store-backed routes until the manager is ready
    let manager = ConnectionManager::new(&config);
    let fatal_rx = manager.fatal_signal();
    manager.clone().spawn_connect();

    let state = AppState {
        config: config.clone(),
        manager: manager.clone(),
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .context("Failed to bind to address")?;
    info!("Contact service listening on 0.0.0.0:{}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(fatal_rx))
        .await
        .context("Failed to start axum server")?;

    manager.close().await;
    info!("Database connection closed");

    if let Some(reason) = manager.fatal_reason() {
        anyhow::bail!("Shut down after fatal database error: {}", reason);
    }

    Ok(())
}

/// Resolves on SIGTERM, Ctrl-C, or a fatal store outage signalled by the
/// Connection Manager
async fn shutdown_signal(mut fatal_rx: watch::Receiver<Option<String>>) {
    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm =
            signal(SignalKind::terminate()).expect("Failed to register SIGTERM handler");
        sigterm.recv().await;
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("SIGINT received, shutting down gracefully...");
        }
        _ = terminate => {
            info!("SIGTERM received, shutting down gracefully...");
        }
        _ = fatal_rx.changed() => {
            let reason = fatal_rx
                .borrow()
                .clone()
                .unwrap_or_else(|| "unknown".to_string());
            error!(reason = %reason, "Fatal database outage, shutting down");
        }
    }
}
