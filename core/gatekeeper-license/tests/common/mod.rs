//! Shared test helpers for license tests.

#![allow(dead_code)]

use base64::Engine;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use ed25519_dalek::{Signer, SigningKey};
use gatekeeper_license::{FixedClock, LicenseValidator, LicenseVerifier, SIGNATURE_ENGINE};

/// Returns a deterministic Ed25519 key pair from a fixed seed.
pub fn test_keypair() -> (SigningKey, [u8; 32]) {
    let seed: [u8; 32] = [
        1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24,
        25, 26, 27, 28, 29, 30, 31, 32,
    ];
    let signing_key = SigningKey::from_bytes(&seed);
    let verifying_key = signing_key.verifying_key();
    (signing_key, verifying_key.to_bytes())
}

/// Creates a signed token `prefix-domain-expiry-signature` exactly as given.
pub fn sign_token(signing_key: &SigningKey, prefix: &str, domain: &str, expiry: &str) -> String {
    let payload = format!("{prefix}-{domain}-{expiry}");
    let signature = signing_key.sign(payload.as_bytes());
    let sig_text = SIGNATURE_ENGINE.encode(signature.to_bytes());
    format!("{payload}-{sig_text}")
}

/// Creates a signed `GF` token.
pub fn make_token(signing_key: &SigningKey, domain: &str, expiry: &str) -> String {
    sign_token(signing_key, "GF", domain, expiry)
}

/// Verifier for the test key pair.
pub fn test_verifier() -> LicenseVerifier {
    let (_, pk) = test_keypair();
    LicenseVerifier::from_public_key_bytes(&pk).unwrap()
}

/// Noon UTC on the given day.
pub fn noon(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

/// Validator for the test key pair frozen at `now`.
pub fn validator_at(now: DateTime<Utc>) -> LicenseValidator<FixedClock> {
    LicenseValidator::new(test_verifier(), FixedClock(now))
}

/// Formats a date as a `YYYYMMDD` expiry field.
pub fn expiry_field(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}
