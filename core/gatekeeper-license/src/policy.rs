//! Policy evaluation: turns a raw token and an optional domain into a verdict.
//!
//! Checks run in a fixed order and stop at the first failure:
//! 1. token present
//! 2. token parses
//! 3. signature verifies
//! 4. not expired
//! 5. domain matches (only when the caller supplies one)

use crate::clock::{Clock, SystemClock};
use crate::domain::{domain_matches, extract_domain};
use crate::error::LicenseError;
use crate::expiry::Expiry;
use crate::signature::LicenseVerifier;
use crate::token::LicenseToken;
use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use tracing::debug;

/// The outcome of validating a license token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseVerification {
    /// True only when every check passed.
    pub valid: bool,
    /// Licensed domain, once the token has parsed.
    pub domain: Option<String>,
    /// Raw expiry field, once the token has parsed.
    pub expiry: Option<String>,
    /// Parsed expiry date; `None` for unlimited or malformed expiries.
    pub expiry_date: Option<NaiveDate>,
    /// True when the expiry date is at or before the evaluation time.
    pub is_expired: bool,
    /// True when the domain check passed or was not requested.
    pub domain_match: bool,
    /// Why the license was rejected.
    #[serde(serialize_with = "serialize_error", skip_serializing_if = "Option::is_none")]
    pub error: Option<LicenseError>,
}

impl LicenseVerification {
    fn rejected(error: LicenseError) -> Self {
        Self {
            valid: false,
            domain: None,
            expiry: None,
            expiry_date: None,
            is_expired: false,
            domain_match: false,
            error: Some(error),
        }
    }

    /// Returns the human-readable rejection message, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    /// Returns the stable rejection code, if any.
    #[must_use]
    pub fn error_code(&self) -> Option<&'static str> {
        self.error.as_ref().map(LicenseError::code)
    }
}

fn serialize_error<S: Serializer>(error: &Option<LicenseError>, serializer: S) -> Result<S::Ok, S::Error> {
    match error {
        Some(err) => serializer.serialize_str(&err.to_string()),
        None => serializer.serialize_none(),
    }
}

/// Validates license tokens against a public key and a clock.
#[derive(Debug, Clone)]
pub struct LicenseValidator<C = SystemClock> {
    verifier: LicenseVerifier,
    clock: C,
}

impl LicenseValidator<SystemClock> {
    /// Validator using the embedded public key and the system clock.
    #[must_use]
    pub fn embedded() -> Self {
        Self::new(LicenseVerifier::embedded(), SystemClock)
    }
}

impl Default for LicenseValidator<SystemClock> {
    fn default() -> Self {
        Self::embedded()
    }
}

impl<C: Clock> LicenseValidator<C> {
    /// Creates a validator from a verifier and a clock.
    pub fn new(verifier: LicenseVerifier, clock: C) -> Self {
        Self { verifier, clock }
    }

    /// Returns the signature verifier.
    #[must_use]
    pub fn verifier(&self) -> &LicenseVerifier {
        &self.verifier
    }

    /// Validates `raw`, optionally checking that it covers `domain`.
    ///
    /// `domain` may be a bare hostname or a full page URL. An empty domain
    /// is treated as absent. Never panics; every failure is reported in the
    /// returned verdict.
    #[must_use]
    pub fn validate(&self, raw: &str, domain: Option<&str>) -> LicenseVerification {
        let raw = raw.trim();
        if raw.is_empty() {
            debug!("no license key provided");
            return LicenseVerification::rejected(LicenseError::NoKey);
        }

        let token = match LicenseToken::parse(raw) {
            Ok(token) => token,
            Err(err) => {
                debug!(error = %err, "license key is malformed");
                return LicenseVerification::rejected(err.into());
            }
        };

        let expiry = token.expiry();
        let mut verdict = LicenseVerification {
            valid: false,
            domain: Some(token.domain().to_string()),
            expiry: Some(token.expiry_text().to_string()),
            expiry_date: expiry.and_then(|e| e.date()),
            is_expired: false,
            domain_match: false,
            error: None,
        };

        if !self.verifier.verify_token(&token) {
            debug!(domain = token.domain(), "license signature rejected");
            verdict.error = Some(LicenseError::InvalidSignature);
            return verdict;
        }

        let now = self.clock.now();
        verdict.is_expired = expiry.is_some_and(|e: Expiry| e.is_expired_at(now));
        if verdict.is_expired {
            debug!(expiry = token.expiry_text(), "license expired");
            verdict.error = Some(LicenseError::Expired);
            return verdict;
        }

        if let Some(requested) = domain.map(str::trim).filter(|d| !d.is_empty()) {
            let requested = extract_domain(requested).unwrap_or_else(|| requested.to_string());
            if !domain_matches(token.domain(), &requested) {
                debug!(licensed = token.domain(), requested = %requested, "license domain mismatch");
                verdict.error = Some(LicenseError::DomainMismatch {
                    expected: token.domain().to_string(),
                    actual: requested,
                });
                return verdict;
            }
        }

        verdict.valid = true;
        verdict.domain_match = true;
        verdict
    }

    /// Returns true if `raw` is fully valid for `domain`.
    #[must_use]
    pub fn is_valid(&self, raw: &str, domain: Option<&str>) -> bool {
        self.validate(raw, domain).valid
    }
}

/// Validates a token with the embedded public key and the system clock.
#[must_use]
pub fn validate(raw: &str, domain: Option<&str>) -> LicenseVerification {
    LicenseValidator::embedded().validate(raw, domain)
}
