//! Ed25519 signature verification for license tokens.
//!
//! The verifier only ever holds the public half of the license key pair.
//! This code ships inside a script served to arbitrary sites, so anything
//! embedded here must be safe to publish.
//!
//! Signatures are base64 encoded without padding over the alphabet
//! `A-Z a-z 0-9 . _`. The URL-safe alphabet cannot be used because its `-`
//! is the token delimiter.

use crate::error::{LicenseError, LicenseResult};
use crate::token::{LicenseToken, LICENSE_PREFIX};
use base64::alphabet::Alphabet;
use base64::engine::{general_purpose::NO_PAD, GeneralPurpose};
use base64::Engine;
use ed25519_dalek::{Signature, Verifier, VerifyingKey, PUBLIC_KEY_LENGTH};
use tracing::debug;

/// Embedded Ed25519 public key for production license verification (32 bytes).
const LICENSE_PUBLIC_KEY: [u8; PUBLIC_KEY_LENGTH] = [
    194, 95, 98, 13, 18, 175, 88, 241, 246, 1, 119, 18, 110, 5, 239, 120,
    124, 193, 109, 196, 216, 201, 93, 200, 14, 99, 48, 16, 99, 40, 250, 33,
];

const SIGNATURE_ALPHABET: Alphabet =
    match Alphabet::new("ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789._") {
        Ok(alphabet) => alphabet,
        Err(_) => panic!("signature alphabet must be 64 unique printable characters"),
    };

/// Encoding used for the signature field of a token.
pub const SIGNATURE_ENGINE: GeneralPurpose = GeneralPurpose::new(&SIGNATURE_ALPHABET, NO_PAD);

/// Returns true if every character of `text` belongs to the signature alphabet.
#[must_use]
pub fn is_signature_text(text: &str) -> bool {
    !text.is_empty()
        && text
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b'_')
}

/// Verifies token signatures against one Ed25519 public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseVerifier {
    key: VerifyingKey,
}

impl LicenseVerifier {
    /// Returns a verifier using the embedded production public key.
    #[must_use]
    pub fn embedded() -> Self {
        match VerifyingKey::from_bytes(&LICENSE_PUBLIC_KEY) {
            Ok(key) => Self { key },
            Err(_) => unreachable!("embedded license public key is a valid Ed25519 point"),
        }
    }

    /// Creates a verifier from raw public key bytes.
    /// Used for testing with a generated key pair.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::InvalidPublicKey`] if the bytes are not a
    /// valid Ed25519 point.
    pub fn from_public_key_bytes(bytes: &[u8; PUBLIC_KEY_LENGTH]) -> LicenseResult<Self> {
        VerifyingKey::from_bytes(bytes)
            .map(|key| Self { key })
            .map_err(|_| LicenseError::InvalidPublicKey)
    }

    /// Creates a verifier from a 64-character hex public key.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::InvalidPublicKey`] if the text is not hex,
    /// has the wrong length, or is not a valid point.
    pub fn from_public_key_hex(text: &str) -> LicenseResult<Self> {
        let mut bytes = [0u8; PUBLIC_KEY_LENGTH];
        hex::decode_to_slice(text.trim(), &mut bytes).map_err(|_| LicenseError::InvalidPublicKey)?;
        Self::from_public_key_bytes(&bytes)
    }

    /// Returns the raw public key bytes.
    #[must_use]
    pub fn public_key_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.key.to_bytes()
    }

    /// Returns true if `raw` carries a valid signature from this key.
    ///
    /// Never panics: malformed tokens, wrong prefixes and undecodable
    /// signatures all yield `false`.
    #[must_use]
    pub fn verify(&self, raw: &str) -> bool {
        match LicenseToken::parse(raw) {
            Ok(token) => self.verify_token(&token),
            Err(err) => {
                debug!(error = %err, "license token did not parse");
                false
            }
        }
    }

    /// Returns true if an already parsed token carries a valid signature.
    #[must_use]
    pub fn verify_token(&self, token: &LicenseToken) -> bool {
        if token.prefix() != LICENSE_PREFIX {
            debug!(prefix = token.prefix(), "license prefix mismatch");
            return false;
        }

        let Ok(sig_bytes) = SIGNATURE_ENGINE.decode(token.signature_text()) else {
            debug!("license signature is not decodable");
            return false;
        };

        let Ok(signature) = Signature::from_slice(&sig_bytes) else {
            debug!(len = sig_bytes.len(), "license signature has the wrong length");
            return false;
        };

        self.key
            .verify(token.signed_payload().as_bytes(), &signature)
            .is_ok()
    }
}

impl Default for LicenseVerifier {
    fn default() -> Self {
        Self::embedded()
    }
}

/// Verifies a token's signature against the embedded public key.
#[must_use]
pub fn verify(raw: &str) -> bool {
    LicenseVerifier::embedded().verify(raw)
}
