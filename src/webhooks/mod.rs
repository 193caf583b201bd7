//! Webhook module for validating Route admission requests.
//!
//! The server is transport glue only: it decodes the AdmissionReview,
//! derives the namespace bypass flag, and maps the decision from
//! [`crate::validation`] onto the admission wire protocol.

mod server;

pub use server::{
    WEBHOOK_CERT_PATH, WEBHOOK_KEY_PATH, WEBHOOK_PORT, WebhookError, WebhookState,
    create_webhook_router, run_webhook_server,
};

// Re-export kube-rs admission types for contract testing
pub use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation};
