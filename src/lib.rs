//! route-timeout-webhook library crate
//!
//! This module exports the Route resource definition, the admission
//! decision logic, and the webhook/health servers.

pub mod config;
pub mod crd;
pub mod error;
pub mod health;
pub mod validation;
pub mod webhooks;

pub use config::AdmissionConfig;
pub use error::{Error, Result};
pub use health::HealthState;
pub use validation::{Verdict, validate_route};
pub use webhooks::{
    WEBHOOK_CERT_PATH, WEBHOOK_KEY_PATH, WEBHOOK_PORT, WebhookError, run_webhook_server,
};
