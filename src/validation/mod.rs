//! Admission decision logic for Routes.
//!
//! Two independent policies, each a pure function over its inputs:
//! - `timeout`: the timeout annotation must be syntactically valid and
//!   within the configured ceiling (unless the namespace carries a bypass)
//! - `tls`: supplied certificate/key material must be structurally valid
//!   PEM-encoded X.509 artifacts, unless termination is passthrough
//!
//! [`validate_route`] sequences them into a single verdict. Everything here
//! is synchronous, reentrant, and free of I/O; the webhook server supplies
//! the decoded Route, the pre-derived bypass flag, and the configuration.

pub mod timeout;
pub mod tls;

use kube::ResourceExt;
use tracing::warn;

use crate::config::{AdmissionConfig, TIMEOUT_ANNOTATION};
use crate::crd::{Route, TerminationType, TlsConfig};
use crate::error::Result;
use self::tls::ArtifactCheck;

/// Terminal outcome of an admission decision.
///
/// System failures (bad configuration, undecodable PEM armor) travel as
/// `Err` on the enclosing `Result`, keeping the Allow/Deny/Error ternary
/// compiler-checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Admit the route, with an optional human-readable message.
    Allow(Option<String>),
    /// Reject the route with an actionable, user-facing reason.
    Deny(String),
}

impl Verdict {
    fn allow(message: &str) -> Self {
        Verdict::Allow(Some(message.to_string()))
    }

    /// Check if the verdict admits the route
    pub fn is_allowed(&self) -> bool {
        matches!(self, Verdict::Allow(_))
    }
}

/// Validate a Route against the timeout and TLS policies.
///
/// Sequencing:
/// 1. No timeout annotation: allow immediately. TLS checks are tied to the
///    timeout path and do not run for annotation-less routes.
/// 2. Syntax check on the annotation; malformed values are denied.
/// 3. TLS artifact checks, when a non-passthrough TLS block is present.
/// 4. Ceiling resolution (configuration errors surface as `Err`) and range
///    check; over-limit timeouts are denied unless `bypass` is set.
pub fn validate_route(route: &Route, bypass: bool, config: &AdmissionConfig) -> Result<Verdict> {
    let annotations = route.annotations();
    let Some(requested) = annotations.get(TIMEOUT_ANNOTATION) else {
        return Ok(Verdict::allow("no timeout annotation is set on the route"));
    };

    if !timeout::check_syntax(requested) {
        return Ok(Verdict::Deny(format!(
            "the timeout annotation '{requested}' is invalid; use <number><unit> \
             where unit is us, ms, s, or m (e.g. '10s' for 10 seconds)"
        )));
    }

    if let Some(tls_config) = &route.spec.tls {
        if let Some(verdict) = check_tls_artifacts(tls_config) {
            return Ok(verdict);
        }
    }

    let ceiling = config.max_timeout_seconds()?;
    let over_limit = timeout::check_range(requested, ceiling)?;

    if over_limit && !bypass {
        return Ok(Verdict::Deny(format!(
            "timeout annotation value '{requested}' exceeds the maximum of {ceiling} seconds"
        )));
    }

    Ok(Verdict::allow("route is valid"))
}

/// Run the TLS artifact gate over a Route's TLS block.
///
/// Passthrough termination is exempt entirely: the router never inspects
/// the traffic, so any populated fields are ignored. For edge and reencrypt
/// termination, each field is checked only when present and non-empty
/// (partial configs relying on the router's default certificate are fine).
///
/// Returns `Some(Deny)` on the first failing artifact, `None` when the gate
/// passes. PEM decode failures and structural parse failures both map to a
/// denial; they are distinguished only in the logs.
fn check_tls_artifacts(tls_config: &TlsConfig) -> Option<Verdict> {
    if tls_config.termination == TerminationType::Passthrough {
        return None;
    }

    if let Some(cert) = non_empty(tls_config.certificate.as_deref()) {
        match tls::validate_certificate(cert) {
            Ok(ArtifactCheck::Valid) => {}
            Ok(ArtifactCheck::Invalid(reason)) => {
                warn!(%reason, "certificate failed structural validation");
                return Some(Verdict::Deny(format!(
                    "spec.tls.certificate is not a valid certificate: {reason}"
                )));
            }
            Err(e) => {
                warn!(error = %e, "certificate PEM decoding failed");
                return Some(Verdict::Deny(format!(
                    "spec.tls.certificate is not valid PEM: {e}"
                )));
            }
        }
    }

    if let Some(key) = non_empty(tls_config.key.as_deref()) {
        match tls::validate_key(key) {
            Ok(ArtifactCheck::Valid) => {}
            Ok(ArtifactCheck::Invalid(reason)) => {
                warn!(%reason, "private key failed structural validation");
                return Some(Verdict::Deny(format!(
                    "spec.tls.key is not a valid private key: {reason}"
                )));
            }
            Err(e) => {
                warn!(error = %e, "private key PEM decoding failed");
                return Some(Verdict::Deny(format!("spec.tls.key is not valid PEM: {e}")));
            }
        }
    }

    None
}

fn non_empty(field: Option<&str>) -> Option<&str> {
    field.filter(|value| !value.is_empty())
}
