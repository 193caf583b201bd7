//! route-timeout-webhook - A validating admission webhook for OpenShift Routes.
//!
//! This is the main entry point that:
//! - Initializes structured logging
//! - Creates the Kubernetes client
//! - Captures the admission configuration from the environment
//! - Starts the health server and, when certificates are mounted, the
//!   webhook server

use std::path::Path;
use std::sync::Arc;

use kube::Client;
use tokio::signal;
use tracing::{error, info, warn};

use route_timeout_webhook::health::{HealthState, run_health_server};
use route_timeout_webhook::{
    AdmissionConfig, WEBHOOK_CERT_PATH, WEBHOOK_KEY_PATH, run_webhook_server,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("route_timeout_webhook=info".parse()?)
                .add_directive("kube=info".parse()?),
        )
        .json()
        .init();

    info!("Starting route-timeout-webhook");

    // Create Kubernetes client
    let client = Client::try_default().await?;
    info!("Connected to Kubernetes cluster");

    // Capture the ceiling setting once; a malformed value is kept so each
    // admission request surfaces it as an operator-facing error instead of
    // the webhook silently applying the default.
    let config = AdmissionConfig::from_env();
    match config.max_timeout_seconds() {
        Ok(ceiling) => info!(ceiling_seconds = ceiling, "Resolved maximum route timeout"),
        Err(e) => warn!(
            error = %e,
            "Maximum timeout configuration is invalid; admission requests will be rejected"
        ),
    }

    // Create shared health state
    let health_state = Arc::new(HealthState::new());

    // Start health server immediately (probes should work before readiness)
    let health_handle = {
        let health_state = health_state.clone();
        tokio::spawn(async move {
            if let Err(e) = run_health_server(health_state).await {
                error!("Health server error: {}", e);
            }
        })
    };

    // Start webhook server if certificates are available. Readiness is
    // marked by the server itself once the TLS material has loaded.
    let webhook_handle =
        if Path::new(WEBHOOK_CERT_PATH).exists() && Path::new(WEBHOOK_KEY_PATH).exists() {
            info!("TLS certificates found, starting webhook server");
            let webhook_client = client.clone();
            let webhook_config = config.clone();
            let webhook_health = health_state.clone();
            Some(tokio::spawn(async move {
                if let Err(e) = run_webhook_server(
                    webhook_client,
                    webhook_config,
                    Some(webhook_health),
                    WEBHOOK_CERT_PATH,
                    WEBHOOK_KEY_PATH,
                )
                .await
                {
                    error!("Webhook server error: {}", e);
                }
            }))
        } else {
            warn!("Webhook certificates not found, webhook server disabled");
            None
        };

    // Wait for any task to complete (or fail), or shutdown signal
    tokio::select! {
        result = health_handle => {
            if let Err(e) = result {
                error!("Health server task panicked: {}", e);
            }
        }
        result = async {
            match webhook_handle {
                Some(handle) => handle.await,
                None => std::future::pending().await,
            }
        } => {
            if let Err(e) = result {
                error!("Webhook server task panicked: {}", e);
            }
        }
        // Handle graceful shutdown on SIGTERM or SIGINT
        _ = shutdown_signal() => {
            info!("Received shutdown signal, shutting down");
            health_state.set_ready(false).await;
        }
    }

    info!("Webhook stopped");
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
///
/// Note: Signal handler setup failures are fatal - the webhook cannot shut
/// down gracefully without them. Using expect() here is intentional.
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
