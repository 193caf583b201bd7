//! OpenShift Route resource definition.
//!
//! Routes describe external ingress for a service. The webhook only needs
//! the TLS block and standard object metadata (annotations and namespace),
//! but the spec mirrors the upstream field names so Routes decode as-is.
//!
//! Example:
//! ```yaml
//! apiVersion: route.openshift.io/v1
//! kind: Route
//! metadata:
//!   name: my-route
//!   annotations:
//!     haproxy.router.openshift.io/timeout: 30s
//! spec:
//!   host: app.example.com
//!   to:
//!     kind: Service
//!     name: my-service
//!   tls:
//!     termination: edge
//! ```

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Route is the OpenShift resource for exposing a service externally.
#[derive(CustomResource, Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "route.openshift.io",
    version = "v1",
    kind = "Route",
    plural = "routes",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct RouteSpec {
    /// Hostname the route is exposed on. The router fills this in when empty.
    #[serde(default)]
    pub host: String,

    /// Optional path prefix for path-based routing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Target service the route points at.
    pub to: RouteTargetReference,

    /// Target port on the backing pods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<RoutePort>,

    /// TLS termination configuration. Absent for plain HTTP routes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsConfig>,
}

/// Reference to the service a Route sends traffic to.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteTargetReference {
    /// Kind of the target (only Service is supported by the router).
    #[serde(default = "default_target_kind")]
    pub kind: String,

    /// Name of the target service.
    pub name: String,

    /// Relative weight for traffic splitting across backends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i32>,
}

fn default_target_kind() -> String {
    "Service".to_string()
}

/// Target port selection for a Route.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoutePort {
    /// Port name or number on the backing pods.
    pub target_port: String,
}

/// How TLS is handled for a Route.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TerminationType {
    /// Terminate TLS at the router edge.
    Edge,
    /// Terminate at the edge and re-establish TLS to the backend.
    Reencrypt,
    /// Pass encrypted traffic through without inspection.
    Passthrough,
}

/// TLS configuration block for a Route.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TlsConfig {
    /// Termination mode for inbound TLS.
    pub termination: TerminationType,

    /// PEM-encoded certificate served by the router. Optional: edge routes
    /// may rely on the router's default certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate: Option<String>,

    /// PEM-encoded private key matching the certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// PEM-encoded CA certificate chain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_certificate: Option<String>,

    /// What to do with insecure (non-TLS) traffic: None, Allow, or Redirect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure_edge_termination_policy: Option<String>,
}

impl TlsConfig {
    /// Build a minimal config with just a termination mode.
    pub fn with_termination(termination: TerminationType) -> Self {
        Self {
            termination,
            certificate: None,
            key: None,
            ca_certificate: None,
            insecure_edge_termination_policy: None,
        }
    }
}
