//! Resource definitions for the admission webhook.
//!
//! - `Route`: the OpenShift Route resource (`route.openshift.io/v1`),
//!   modeled with the fields the webhook reads.

mod route;

pub use route::*;
