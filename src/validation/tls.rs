//! TLS artifact validation.
//!
//! Structural checks only: a certificate must be a PEM block labeled
//! `CERTIFICATE` whose payload parses as X.509 DER, and a key must be a PEM
//! block labeled `RSA PRIVATE KEY` whose payload parses as PKCS#1, PKCS#8,
//! or SEC1 EC. Trust chains and expiry are out of scope; the router is the
//! authority on whether a certificate is acceptable for serving.
//!
//! Failure taxonomy: broken PEM armor or a wrong block label is surfaced as
//! an `Error` (the input is not what the field is supposed to carry at all),
//! while a decodable block with an unparsable payload is an
//! `ArtifactCheck::Invalid`. The orchestrator denies on both; the split
//! exists for diagnostics.

use crate::error::{Error, Result};
use x509_cert::der::Decode;

/// Expected PEM label for certificates
pub const CERTIFICATE_BLOCK_TYPE: &str = "CERTIFICATE";

/// Expected PEM label for private keys
pub const PRIVATE_KEY_BLOCK_TYPE: &str = "RSA PRIVATE KEY";

/// Outcome of a structural artifact check.
///
/// `Invalid` carries a user-facing reason; system-level failures travel as
/// `Err` on the enclosing `Result` instead of a third variant, so the
/// Deny/Error distinction is checked at compile time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactCheck {
    /// The artifact parsed as the expected structure.
    Valid,
    /// The artifact decoded but did not parse; reason is user-facing.
    Invalid(String),
}

impl ArtifactCheck {
    /// Check if the artifact was valid
    pub fn is_valid(&self) -> bool {
        matches!(self, ArtifactCheck::Valid)
    }
}

/// Decode one PEM block and require an exact type label.
fn decode_pem_block(input: &str, expected_type: &str) -> Result<Vec<u8>> {
    let block = pem::parse(input)?;
    if block.tag() != expected_type {
        return Err(Error::PemBlockType {
            got: block.tag().to_string(),
            want: expected_type.to_string(),
        });
    }
    Ok(block.into_contents())
}

/// Validate that a string is a well-formed PEM-encoded X.509 certificate.
pub fn validate_certificate(cert: &str) -> Result<ArtifactCheck> {
    let der = decode_pem_block(cert, CERTIFICATE_BLOCK_TYPE)?;
    match x509_cert::Certificate::from_der(&der) {
        Ok(_) => Ok(ArtifactCheck::Valid),
        Err(e) => Ok(ArtifactCheck::Invalid(format!(
            "certificate does not parse as X.509: {e}"
        ))),
    }
}

/// Validate that a string is a well-formed PEM-encoded private key.
///
/// The payload is tried as PKCS#1, then PKCS#8, then SEC1 EC; any one
/// parsing is sufficient.
pub fn validate_key(key: &str) -> Result<ArtifactCheck> {
    let der = decode_pem_block(key, PRIVATE_KEY_BLOCK_TYPE)?;

    if pkcs1::RsaPrivateKey::try_from(der.as_slice()).is_ok()
        || pkcs8::PrivateKeyInfo::try_from(der.as_slice()).is_ok()
        || sec1::EcPrivateKey::try_from(der.as_slice()).is_ok()
    {
        return Ok(ArtifactCheck::Valid);
    }

    Ok(ArtifactCheck::Invalid(
        "key does not parse as a PKCS#1, PKCS#8, or SEC1 EC private key".to_string(),
    ))
}
