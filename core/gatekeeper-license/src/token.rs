//! License token structure and parsing.
//!
//! Tokens use the format: `PREFIX-DOMAIN-EXPIRY-SIGNATURE`
//!
//! - `PREFIX`: the scheme tag [`LICENSE_PREFIX`]
//! - `DOMAIN`: `example.com` or `*.example.com`
//! - `EXPIRY`: [`UNLIMITED`](crate::UNLIMITED) or `YYYYMMDD`
//! - `SIGNATURE`: Ed25519 signature over `PREFIX-DOMAIN-EXPIRY`
//!
//! Splitting is positional: the first segment is the prefix and the last is
//! the signature. Of the segments in between, the last is the expiry and the
//! rest, rejoined, are the domain. Neither the signature alphabet nor the
//! expiry contain the delimiter, so domains such as `my-shop.com` survive.

use crate::domain::is_hostname;
use crate::error::ParseError;
use crate::expiry::{is_expiry_text, Expiry};
use crate::signature::is_signature_text;

/// Scheme tag every token starts with.
pub const LICENSE_PREFIX: &str = "GF";

/// Separator between token fields.
pub const DELIMITER: char = '-';

/// Minimum number of delimiter-separated segments in a token.
const MIN_SEGMENTS: usize = 4;

/// A license token split into its fields.
///
/// Parsing only checks structure; nothing here is trusted until the
/// signature has been verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseToken {
    prefix: String,
    domain: String,
    expiry: String,
    signature: String,
}

impl LicenseToken {
    /// Splits a raw token into its fields.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than four segments or any field
    /// is empty.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let segments: Vec<&str> = raw.split(DELIMITER).collect();
        if segments.len() < MIN_SEGMENTS {
            return Err(ParseError::TooFewSegments(segments.len()));
        }

        let (prefix, rest) = segments.split_first().ok_or(ParseError::TooFewSegments(0))?;
        let (signature, middle) = rest.split_last().ok_or(ParseError::TooFewSegments(1))?;
        let (expiry, domain_parts) = middle.split_last().ok_or(ParseError::TooFewSegments(2))?;
        let domain = domain_parts.join("-");

        if prefix.is_empty() {
            return Err(ParseError::EmptyField("prefix"));
        }
        if domain.is_empty() {
            return Err(ParseError::EmptyField("domain"));
        }
        if expiry.is_empty() {
            return Err(ParseError::EmptyField("expiry"));
        }
        if signature.is_empty() {
            return Err(ParseError::EmptyField("signature"));
        }

        Ok(Self {
            prefix: (*prefix).to_string(),
            domain,
            expiry: (*expiry).to_string(),
            signature: (*signature).to_string(),
        })
    }

    /// Returns the scheme tag.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the licensed domain exactly as it appears in the token.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Returns the expiry field exactly as it appears in the token.
    #[must_use]
    pub fn expiry_text(&self) -> &str {
        &self.expiry
    }

    /// Returns the parsed expiry, or `None` if the field is malformed.
    #[must_use]
    pub fn expiry(&self) -> Option<Expiry> {
        Expiry::parse(&self.expiry)
    }

    /// Returns the encoded signature field.
    #[must_use]
    pub fn signature_text(&self) -> &str {
        &self.signature
    }

    /// Returns the bytes covered by the signature: `prefix-domain-expiry`.
    #[must_use]
    pub fn signed_payload(&self) -> String {
        signed_payload(&self.prefix, &self.domain, &self.expiry)
    }
}

/// Builds the canonical signed payload. Field order and delimiter are part
/// of the wire format; changing either invalidates every issued token.
#[must_use]
pub fn signed_payload(prefix: &str, domain: &str, expiry: &str) -> String {
    format!("{prefix}{DELIMITER}{domain}{DELIMITER}{expiry}")
}

/// Checks the structural shape of a token without touching cryptography.
///
/// Suitable for rejecting obviously malformed input in configuration forms.
#[must_use]
pub fn is_valid_format(raw: &str) -> bool {
    let Ok(token) = LicenseToken::parse(raw.trim()) else {
        return false;
    };
    token.prefix == LICENSE_PREFIX
        && is_hostname(&token.domain)
        && is_expiry_text(&token.expiry)
        && is_signature_text(&token.signature)
}
