//! Error types for license parsing and verification.

use thiserror::Error;

/// Structural problems found while splitting a license token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The token did not split into prefix, domain, expiry and signature.
    #[error("expected at least 4 `-`-separated segments, found {0}")]
    TooFewSegments(usize),

    /// One of the required fields was empty.
    #[error("license field `{0}` is empty")]
    EmptyField(&'static str),
}

/// Reasons a license verdict is negative.
///
/// The `Display` text of each variant is the message shown to operators;
/// [`LicenseError::code`] is the stable machine-readable form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LicenseError {
    /// Empty or missing token.
    #[error("No license key provided")]
    NoKey,

    /// Token does not split into the required fields.
    #[error("Invalid license format")]
    Malformed(#[source] ParseError),

    /// Signature does not verify against the recomputed payload.
    #[error("Invalid license signature")]
    InvalidSignature,

    /// Expiry date is at or before the current time.
    #[error("License has expired")]
    Expired,

    /// Domain check was requested and failed.
    #[error("License is for domain {expected}, not {actual}")]
    DomainMismatch {
        /// Domain the license was issued for.
        expected: String,
        /// Domain the caller asked about.
        actual: String,
    },

    /// Issuer was asked to sign a domain that cannot be a license domain.
    #[error("invalid license domain: {0}")]
    InvalidDomain(String),

    /// Issuer was asked to sign an expiry that does not fit the `YYYYMMDD` field.
    #[error("invalid license expiry: {0}")]
    InvalidExpiry(String),

    /// Public key bytes do not describe a valid Ed25519 point.
    #[error("invalid public key")]
    InvalidPublicKey,
}

impl LicenseError {
    /// Returns the stable error code for this failure.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoKey => "no_key",
            Self::Malformed(_) => "malformed",
            Self::InvalidSignature => "bad_signature",
            Self::Expired => "expired",
            Self::DomainMismatch { .. } => "domain_mismatch",
            Self::InvalidDomain(_) => "invalid_domain",
            Self::InvalidExpiry(_) => "invalid_expiry",
            Self::InvalidPublicKey => "invalid_public_key",
        }
    }
}

impl From<ParseError> for LicenseError {
    fn from(err: ParseError) -> Self {
        Self::Malformed(err)
    }
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;
