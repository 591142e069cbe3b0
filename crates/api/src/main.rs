use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use netops_agent::HttpConnector;
use netops_core::crypto::{Cipher, EncryptionKey};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use netops_api::config::{LogFormat, ServerConfig};
use netops_api::router::build_app_router;
use netops_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ServerConfig::from_env().context("Invalid server configuration")?;

    // --- Tracing ---
    init_tracing(config.log_format);
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Encryption key ---
    let key = EncryptionKey::from_env().context("Cannot load ENCRYPTION_KEY")?;
    let cipher = Cipher::new(key);
    tracing::info!("Encryption key loaded");

    // --- App state ---
    let connector = Arc::new(HttpConnector::new(
        reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.dispatch_timeout_secs))
            .build()
            .context("Failed to build agent HTTP client")?,
    ));
    let state = AppState::new(config.clone(), cipher, connector);
    let journal_handle = state.spawn_journal();
    tracing::info!("Audit journal started");

    let orchestrator = Arc::clone(&state.orchestrator);

    // --- Router ---
    let app = build_app_router(state).context("Invalid server configuration")?;

    // --- Start server ---
    let host: IpAddr = config
        .host
        .parse()
        .with_context(|| format!("Invalid HOST address '{}'", config.host))?;
    let addr = SocketAddr::new(host, config.port);
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");
    let grace = Duration::from_secs(config.shutdown_timeout_secs);

    // Stop playbook status watchers.
    if tokio::time::timeout(grace, orchestrator.shutdown()).await.is_err() {
        tracing::warn!("Status watchers did not stop within the shutdown timeout");
    }

    // Dropping the last state handle closes the event bus, which ends the
    // journal loop.
    drop(orchestrator);
    let _ = tokio::time::timeout(grace, journal_handle).await;
    tracing::info!("Graceful shutdown complete");

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "netops_api=debug,netops_dispatch=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
