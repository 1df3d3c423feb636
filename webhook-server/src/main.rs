//! Hookify web server - receives webhooks and authenticates them.
//!
//! This binary:
//! - Loads configuration from the environment (and `.env`)
//! - Verifies every webhook body against its HMAC-SHA256 signature
//! - Drains in-flight requests on shutdown, within a bounded timeout

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal, sync::oneshot};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hookify::{router, AppState, Config, SignatureValidator};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("web_server_starting");

    // Load configuration
    let config = Config::load();
    info!(
        port = config.port,
        webhook_path = %config.webhook_path,
        signature_header = %config.signature_header,
        signature_encoding = %config.signature_encoding,
        max_body_bytes = config.max_body_bytes,
        webhook_secret_configured = config.webhook_secret.is_some(),
        "config_loaded"
    );

    let secret = config
        .webhook_secret
        .clone()
        .context("WEBHOOK_SECRET must be set")?;
    if secret.is_empty() {
        warn!("webhook_secret_empty");
    }

    let shutdown_timeout = config.shutdown_timeout;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = AppState::new(config, SignatureValidator::new(secret));
    let app = router(state);

    // Bind to address
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "web_server_listening");

    // Run server with graceful shutdown
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
    });

    tokio::select! {
        result = &mut server => {
            result.context("Server task failed")?.context("Server error")?;
            return Ok(());
        }
        _ = shutdown_signal() => {}
    }

    let _ = shutdown_tx.send(());

    match tokio::time::timeout(shutdown_timeout, server).await {
        Ok(result) => {
            result.context("Server task failed")?.context("Server error")?;
            info!("web_server_shutdown_complete");
        }
        Err(_) => {
            warn!(
                timeout_secs = shutdown_timeout.as_secs(),
                "web_server_forced_shutdown"
            );
        }
    }

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "ctrl_c_handler_failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "sigterm_handler_failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("web_server_shutting_down");
}
