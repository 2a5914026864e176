//! Property-based tests for license verification.
//!
//! These tests verify properties that must always hold:
//! - Arbitrary input never panics and always yields a structured rejection
//! - Issued tokens round-trip through validation
//! - Any change to a signed field breaks the signature

mod common;

use common::{make_token, noon, test_keypair, test_verifier, validator_at};
use gatekeeper_license::{domain_matches, is_valid_format, LicenseToken};
use proptest::prelude::*;

// =============================================================================
// HELPER STRATEGIES
// =============================================================================

fn label_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9]([a-z0-9-]{0,10}[a-z0-9])?").unwrap()
}

fn domain_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(label_strategy(), 2..5).prop_map(|labels| labels.join("."))
}

fn expiry_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("UNLIMITED".to_string()),
        (2027i32..2100, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| format!("{y:04}{m:02}{d:02}")),
    ]
}

// =============================================================================
// ROBUSTNESS
// =============================================================================

proptest! {
    /// Random text never panics and is never valid.
    #[test]
    fn arbitrary_input_is_rejected(raw in ".*", domain in proptest::option::of(".*")) {
        let verdict = validator_at(noon(2026, 10, 16)).validate(&raw, domain.as_deref());
        prop_assert!(!verdict.valid);
        prop_assert!(verdict.error.is_some());
    }

    /// Token-shaped garbage never verifies.
    #[test]
    fn token_shaped_garbage_is_rejected(
        domain in domain_strategy(),
        expiry in expiry_strategy(),
        sig in "[A-Za-z0-9._]{0,120}",
    ) {
        let raw = format!("GF-{domain}-{expiry}-{sig}");
        prop_assert!(!test_verifier().verify(&raw));
    }

    /// Parsing never panics on arbitrary text.
    #[test]
    fn parse_never_panics(raw in ".*") {
        let _ = LicenseToken::parse(&raw);
        let _ = is_valid_format(&raw);
    }
}

// =============================================================================
// ROUND TRIP AND TAMPERING
// =============================================================================

proptest! {
    /// Issued tokens validate with and without their own domain.
    #[test]
    fn issued_tokens_roundtrip(domain in domain_strategy(), expiry in expiry_strategy()) {
        let (sk, _) = test_keypair();
        let token = make_token(&sk, &domain, &expiry);
        let validator = validator_at(noon(2026, 10, 16));

        prop_assert!(is_valid_format(&token));
        prop_assert!(validator.is_valid(&token, None));

        let verdict = validator.validate(&token, Some(&domain));
        prop_assert!(verdict.valid);
        prop_assert!(verdict.domain_match);
        prop_assert_eq!(verdict.domain.as_deref(), Some(domain.as_str()));
        prop_assert_eq!(verdict.expiry.as_deref(), Some(expiry.as_str()));
    }

    /// Signing one domain and presenting another fails verification.
    #[test]
    fn domain_substitution_fails(a in domain_strategy(), b in domain_strategy()) {
        prop_assume!(a != b);
        let (sk, _) = test_keypair();
        let token = make_token(&sk, &a, "UNLIMITED");
        let forged = token.replacen(&format!("GF-{a}-"), &format!("GF-{b}-"), 1);
        prop_assert!(!test_verifier().verify(&forged));
    }

    /// Wildcards cover every subdomain of their suffix.
    #[test]
    fn wildcard_covers_subdomains(sub in label_strategy(), domain in domain_strategy()) {
        let licensed = format!("*.{domain}");
        let requested = format!("{sub}.{domain}");
        prop_assert!(domain_matches(&licensed, &requested));
        prop_assert!(domain_matches(&licensed, &domain));
        let nested = format!("{sub}x.{domain}");
        prop_assert!(!domain_matches(&domain, &nested));
    }

    /// Case never affects matching.
    #[test]
    fn matching_ignores_case(domain in domain_strategy()) {
        prop_assert!(domain_matches(&domain.to_uppercase(), &domain));
        prop_assert!(domain_matches(&domain, &domain.to_uppercase()));
    }
}
