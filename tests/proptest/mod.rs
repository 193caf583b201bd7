// Test code is allowed to panic on failure
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Property-based tests for the timeout validator.
//!
//! Uses proptest to generate random inputs and verify invariants.

use proptest::prelude::*;

use route_timeout_webhook::validation::timeout::{check_range, check_syntax};

/// Strategy for generating a valid unit suffix.
fn any_unit() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("us"), Just("ms"), Just("s"), Just("m")]
}

/// Multiplier to seconds for a unit suffix.
fn unit_seconds(unit: &str) -> f64 {
    match unit {
        "us" => 1e-6,
        "ms" => 1e-3,
        "s" => 1.0,
        "m" => 60.0,
        other => panic!("unexpected unit {other}"),
    }
}

proptest! {
    /// Every <digits><unit> composite passes the syntax gate.
    #[test]
    fn valid_composites_pass_syntax(magnitude in 0u64..=1_000_000_000, unit in any_unit()) {
        let timeout = format!("{magnitude}{unit}");
        prop_assert!(check_syntax(&timeout));
    }

    /// A bare number with no unit never passes.
    #[test]
    fn bare_numbers_fail_syntax(magnitude in 0u64..=1_000_000_000) {
        prop_assert!(!check_syntax(&magnitude.to_string()));
    }

    /// Doubled composites (the "1s1s" family) never pass.
    #[test]
    fn doubled_composites_fail_syntax(
        a in 0u64..=1_000_000,
        ua in any_unit(),
        b in 0u64..=1_000_000,
        ub in any_unit(),
    ) {
        let timeout = format!("{a}{ua}{b}{ub}");
        prop_assert!(!check_syntax(&timeout));
    }

    /// check_range agrees with direct unit arithmetic, and equality is
    /// never over-limit.
    #[test]
    fn range_matches_unit_arithmetic(
        magnitude in 0u64..=1_000_000,
        unit in any_unit(),
        ceiling in 0u64..=100_000,
    ) {
        let timeout = format!("{magnitude}{unit}");
        let seconds = magnitude as f64 * unit_seconds(unit);
        let over = check_range(&timeout, ceiling as f64).unwrap();
        prop_assert_eq!(over, seconds > ceiling as f64);
    }

    /// Any syntactically valid timeout parses in check_range (the syntax
    /// gate is at least as strict as the parser).
    #[test]
    fn syntax_implies_parsable(magnitude in 0u64..=u64::MAX, unit in any_unit()) {
        let timeout = format!("{magnitude}{unit}");
        prop_assert!(check_syntax(&timeout));
        prop_assert!(check_range(&timeout, 600.0).is_ok());
    }
}
