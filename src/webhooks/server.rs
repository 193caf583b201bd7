//! Admission webhook server.
//!
//! Provides the HTTP endpoint for the Route validating webhook.
//!
//! To enable the webhook:
//! 1. Deploy cert-manager for TLS certificates
//! 2. Create a ValidatingWebhookConfiguration for routes.route.openshift.io
//!    pointing at /validate-v1-route
//! 3. Mount the TLS certificate secret to the webhook pod at /etc/webhook/certs/
//!
//! The webhook server starts automatically when certificates are present.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use k8s_openapi::api::core::v1::Namespace;
use kube::core::DynamicObject;
use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation};
use kube::{Api, Client, ResourceExt};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::config::{AdmissionConfig, BYPASS_TIMEOUT_LABEL, BYPASS_TIMEOUT_VALUE, TIMEOUT_ANNOTATION};
use crate::crd::Route;
use crate::error::Error;
use crate::health::HealthState;
use crate::validation::{Verdict, validate_route};

/// Default path to webhook TLS certificate
pub const WEBHOOK_CERT_PATH: &str = "/etc/webhook/certs/tls.crt";
/// Default path to webhook TLS private key
pub const WEBHOOK_KEY_PATH: &str = "/etc/webhook/certs/tls.key";
/// Default webhook server port
pub const WEBHOOK_PORT: u16 = 9443;

/// Shared state for webhook handlers
pub struct WebhookState {
    pub client: Client,
    pub config: AdmissionConfig,
    pub health: Option<Arc<HealthState>>,
}

impl WebhookState {
    pub fn new(client: Client, config: AdmissionConfig, health: Option<Arc<HealthState>>) -> Self {
        Self {
            client,
            config,
            health,
        }
    }

    /// Record an admission decision if metrics are enabled
    fn record(&self, namespace: Option<&str>, verdict: &str, started: std::time::Instant) {
        if let Some(health) = &self.health {
            health.metrics.record_admission(
                namespace.unwrap_or("unknown"),
                verdict,
                started.elapsed().as_secs_f64(),
            );
        }
    }
}

/// Check whether a namespace carries the timeout bypass label.
///
/// Only the exact value `"true"` activates the bypass; any other value,
/// including the label being absent, does not.
pub fn bypass_enabled(namespace: &Namespace) -> bool {
    namespace
        .labels()
        .get(BYPASS_TIMEOUT_LABEL)
        .is_some_and(|value| value == BYPASS_TIMEOUT_VALUE)
}

/// Create a denial response with reason embedded in message.
/// kube-rs deny() only sets status.message, so we format as "[reason] message"
fn deny_with_reason(
    request: &AdmissionRequest<Route>,
    message: &str,
    reason: &str,
) -> AdmissionReview<DynamicObject> {
    let full_message = format!("[{}] {}", reason, message);
    AdmissionResponse::from(request)
        .deny(full_message)
        .into_review()
}

/// Create the webhook router
pub fn create_webhook_router(state: Arc<WebhookState>) -> Router {
    Router::new()
        .route("/validate-v1-route", post(validate_v1_route))
        .with_state(state)
}

/// Validating webhook handler for Routes
async fn validate_v1_route(
    State(state): State<Arc<WebhookState>>,
    Json(review): Json<AdmissionReview<Route>>,
) -> impl IntoResponse {
    let started = std::time::Instant::now();

    let request: AdmissionRequest<Route> = match review.try_into() {
        Ok(req) => req,
        Err(e) => {
            error!(error = %e, "Failed to extract admission request");
            return (
                StatusCode::BAD_REQUEST,
                Json(
                    AdmissionResponse::invalid(format!("Invalid AdmissionReview: {}", e))
                        .into_review(),
                ),
            );
        }
    };

    let uid = &request.uid;
    debug!(
        uid = %uid,
        operation = ?request.operation,
        namespace = ?request.namespace,
        name = ?request.name,
        "Processing admission request"
    );

    // DELETE operations are always allowed
    if request.operation == Operation::Delete {
        info!(uid = %uid, "Admission request allowed (DELETE)");
        return (
            StatusCode::OK,
            Json(AdmissionResponse::from(&request).into_review()),
        );
    }

    let route: Route = match &request.object {
        Some(obj) => obj.clone(),
        None => {
            error!(uid = %uid, "Missing object in request");
            return (
                StatusCode::OK,
                Json(deny_with_reason(
                    &request,
                    "Missing object in request",
                    "InvalidRequest",
                )),
            );
        }
    };

    // The bypass flag only matters when a timeout annotation exists, so the
    // namespace lookup is skipped for annotation-less routes.
    let bypass = if route.annotations().contains_key(TIMEOUT_ANNOTATION) {
        match lookup_bypass(&state.client, &request, &route).await {
            Ok(bypass) => bypass,
            Err(e) => {
                error!(uid = %uid, error = %e, "Failed to get namespace");
                state.record(request.namespace.as_deref(), "errored", started);
                return (
                    StatusCode::OK,
                    Json(deny_with_reason(
                        &request,
                        &format!("internal error: failed to get namespace: {}", e),
                        "InternalError",
                    )),
                );
            }
        }
    } else {
        false
    };

    let namespace = request.namespace.as_deref();
    match validate_route(&route, bypass, &state.config) {
        Ok(Verdict::Allow(message)) => {
            info!(uid = %uid, message = ?message, "Admission request allowed");
            state.record(namespace, "allowed", started);
            (
                StatusCode::OK,
                Json(AdmissionResponse::from(&request).into_review()),
            )
        }
        Ok(Verdict::Deny(reason)) => {
            warn!(uid = %uid, reason = %reason, "Admission request denied");
            state.record(namespace, "denied", started);
            (
                StatusCode::OK,
                Json(deny_with_reason(&request, &reason, "RoutePolicyViolation")),
            )
        }
        Err(e) => {
            error!(uid = %uid, error = %e, "Admission request errored");
            state.record(namespace, "errored", started);
            (
                StatusCode::OK,
                Json(deny_with_reason(
                    &request,
                    &format!("internal error: {}", e),
                    "InternalError",
                )),
            )
        }
    }
}

/// Fetch the Route's namespace and derive the bypass flag from its labels.
async fn lookup_bypass(
    client: &Client,
    request: &AdmissionRequest<Route>,
    route: &Route,
) -> Result<bool, Error> {
    let Some(namespace_name) = request.namespace.clone().or_else(|| route.namespace()) else {
        return Ok(false);
    };

    let namespaces: Api<Namespace> = Api::all(client.clone());
    let namespace = namespaces.get(&namespace_name).await?;
    Ok(bypass_enabled(&namespace))
}

/// Errors that can occur when running the webhook server
#[derive(Debug)]
pub enum WebhookError {
    /// TLS configuration error
    TlsConfig(String),
    /// Server error
    Server(String),
}

impl std::fmt::Display for WebhookError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WebhookError::TlsConfig(msg) => write!(f, "TLS configuration error: {}", msg),
            WebhookError::Server(msg) => write!(f, "Webhook server error: {}", msg),
        }
    }
}

impl std::error::Error for WebhookError {}

/// Run the webhook server with TLS
///
/// Binds to 0.0.0.0:9443 and serves the /validate-v1-route endpoint.
/// TLS certificates are loaded from the paths specified.
///
/// Readiness is owned here: the health state is marked ready only once the
/// TLS material has loaded, and cleared again when the server exits, so a
/// pod with broken certificates never reports ready.
///
/// # Arguments
/// * `client` - Kubernetes client (used to look up namespaces)
/// * `config` - Resolved admission configuration
/// * `health` - Shared health state; readiness and admission metrics are
///   driven through it when present
/// * `cert_path` - Path to TLS certificate file (PEM format)
/// * `key_path` - Path to TLS private key file (PEM format)
pub async fn run_webhook_server(
    client: Client,
    config: AdmissionConfig,
    health: Option<Arc<HealthState>>,
    cert_path: &str,
    key_path: &str,
) -> Result<(), WebhookError> {
    use axum_server::tls_rustls::RustlsConfig;
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let state = Arc::new(WebhookState::new(client, config, health.clone()));
    let app = create_webhook_router(state);

    let tls = RustlsConfig::from_pem_file(PathBuf::from(cert_path), PathBuf::from(key_path))
        .await
        .map_err(|e| WebhookError::TlsConfig(e.to_string()))?;

    if let Some(health) = &health {
        health.set_ready(true).await;
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], WEBHOOK_PORT));
    info!(port = WEBHOOK_PORT, "Webhook server listening with TLS");

    let served = axum_server::bind_rustls(addr, tls)
        .serve(app.into_make_service())
        .await;

    if let Some(health) = &health {
        health.set_ready(false).await;
    }

    served.map_err(|e| WebhookError::Server(e.to_string()))?;

    Ok(())
}
