//! Timeout annotation validation.
//!
//! Two checks, run in order by the orchestrator:
//! - `check_syntax`: purely syntactic gate on the annotation string
//! - `check_range`: semantic comparison against the configured ceiling

use crate::error::{Error, Result};

/// Check if a timeout string is syntactically valid.
///
/// Accepts exactly `<non-negative integer><unit>` where unit is one of
/// `us`, `ms`, `s`, or `m`. No whitespace, sign, decimal point, or compound
/// units.
pub fn check_syntax(timeout: &str) -> bool {
    use std::sync::LazyLock;
    // Pattern: ^[0-9]+(us|ms|s|m)$
    static TIMEOUT_RE: LazyLock<Option<regex::Regex>> =
        LazyLock::new(|| regex::Regex::new(r"^[0-9]+(us|ms|s|m)$").ok());
    TIMEOUT_RE.as_ref().is_some_and(|re| re.is_match(timeout))
}

/// Parse a timeout string into seconds.
///
/// Unit semantics: `us` microseconds, `ms` milliseconds, `s` seconds,
/// `m` minutes. The magnitude is parsed as a float so arbitrarily large
/// annotation values compare against the ceiling instead of overflowing.
fn parse_seconds(timeout: &str) -> Result<f64> {
    // Two-letter suffixes first so "10ms" is not read as "10m" + "s".
    let (digits, multiplier) = if let Some(d) = timeout.strip_suffix("us") {
        (d, 1e-6)
    } else if let Some(d) = timeout.strip_suffix("ms") {
        (d, 1e-3)
    } else if let Some(d) = timeout.strip_suffix('s') {
        (d, 1.0)
    } else if let Some(d) = timeout.strip_suffix('m') {
        (d, 60.0)
    } else {
        return Err(Error::TimeoutParse(timeout.to_string()));
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::TimeoutParse(timeout.to_string()));
    }

    let magnitude: f64 = digits
        .parse()
        .map_err(|_| Error::TimeoutParse(timeout.to_string()))?;
    Ok(magnitude * multiplier)
}

/// Check if a timeout exceeds the ceiling.
///
/// Returns `true` iff the parsed duration is strictly greater than
/// `ceiling_seconds`; a timeout equal to the ceiling is permitted. A parse
/// error here means the caller skipped [`check_syntax`], surfaced as an
/// `Error` rather than a denial.
pub fn check_range(timeout: &str, ceiling_seconds: f64) -> Result<bool> {
    Ok(parse_seconds(timeout)? > ceiling_seconds)
}
