//! Error types for the admission webhook.
//!
//! Errors here are operator-facing: they describe conditions the webhook
//! itself cannot recover from (bad configuration, undecodable input, API
//! failures). User-facing policy rejections are expressed as
//! [`crate::validation::Verdict::Deny`], never as an `Error`.

use thiserror::Error;

/// Error type for admission operations
#[derive(Error, Debug)]
pub enum Error {
    /// Kubernetes API error
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    /// The configured maximum timeout is present but not parsable
    #[error("invalid max timeout configuration '{value}': {source}")]
    Config {
        value: String,
        source: std::num::ParseFloatError,
    },

    /// PEM armor failed to decode at all
    #[error("failed to decode PEM block: {0}")]
    PemDecode(#[from] pem::PemError),

    /// A PEM block decoded but carried the wrong type label
    #[error("invalid PEM block type: got '{got}', want '{want}'")]
    PemBlockType { got: String, want: String },

    /// A timeout string passed the syntax gate but failed to parse.
    /// Indicates an invariant violation between check_syntax and check_range.
    #[error("timeout '{0}' passed the syntax check but failed to parse")]
    TimeoutParse(String),
}

/// Result type alias for admission operations
pub type Result<T> = std::result::Result<T, Error>;
