//! License verification for the Gatekeeper protection script.
//!
//! This crate handles:
//! - Token parsing into prefix, domain, expiry and signature
//! - Ed25519 signature verification against an embedded public key
//! - Policy evaluation: expiry and domain checks with stable error codes
//! - Token issuance (behind the `issuer` feature)
//!
//! # Design Principles
//!
//! - **Public key only**: verifying code embeds the public key; the private
//!   key stays with the issuer
//! - **Never panics**: every failure is reported through the verdict
//! - **Pure**: the only external input is the current time, read through a
//!   [`Clock`]
//!
//! # License Key Format
//!
//! Keys are formatted as: `GF-<domain>-<expiry>-<signature>`
//! where `<expiry>` is `UNLIMITED` or `YYYYMMDD` and `<signature>` is an
//! Ed25519 signature over `GF-<domain>-<expiry>`.

mod clock;
mod domain;
mod error;
mod expiry;
#[cfg(feature = "issuer")]
mod issuer;
mod policy;
mod signature;
mod token;

pub use clock::{Clock, FixedClock, SystemClock};
pub use domain::{domain_matches, extract_domain, is_hostname};
pub use error::{LicenseError, LicenseResult, ParseError};
pub use expiry::{Expiry, UNLIMITED};
pub use policy::{validate, LicenseValidator, LicenseVerification};
pub use signature::{is_signature_text, verify, LicenseVerifier, SIGNATURE_ENGINE};
pub use token::{is_valid_format, signed_payload, LicenseToken, DELIMITER, LICENSE_PREFIX};

#[cfg(feature = "issuer")]
pub use issuer::LicenseIssuer;
