//! License issuance. Holds the private half of the key pair and must never
//! be compiled into code that is delivered to clients.

use crate::domain::is_hostname;
use crate::error::{LicenseError, LicenseResult};
use crate::expiry::Expiry;
use crate::signature::{LicenseVerifier, SIGNATURE_ENGINE};
use crate::token::{signed_payload, DELIMITER, LICENSE_PREFIX};
use base64::Engine;
use ed25519_dalek::{Signer, SigningKey, SECRET_KEY_LENGTH};
use rand::rngs::OsRng;
use tracing::info;

/// Signs license tokens.
pub struct LicenseIssuer {
    signing_key: SigningKey,
}

impl LicenseIssuer {
    /// Generates a new random key pair.
    #[must_use]
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Restores an issuer from a raw 32-byte secret.
    #[must_use]
    pub fn from_secret_bytes(bytes: &[u8; SECRET_KEY_LENGTH]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(bytes),
        }
    }

    /// Returns the raw 32-byte secret.
    #[must_use]
    pub fn secret_bytes(&self) -> [u8; SECRET_KEY_LENGTH] {
        self.signing_key.to_bytes()
    }

    /// Returns the public key bytes to embed in verifying code.
    #[must_use]
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Returns a verifier for tokens issued by this issuer.
    #[must_use]
    pub fn verifier(&self) -> LicenseVerifier {
        match LicenseVerifier::from_public_key_bytes(&self.public_key_bytes()) {
            Ok(verifier) => verifier,
            Err(_) => unreachable!("public key derived from a signing key is always valid"),
        }
    }

    /// Issues a token for `domain` expiring at `expiry`.
    ///
    /// The domain is lowercased before signing so the stored token reads the
    /// same way it is matched.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::InvalidDomain`] if `domain` is not a hostname
    /// or `*.`-prefixed wildcard hostname, and [`LicenseError::InvalidExpiry`]
    /// if the expiry date falls outside years 0001 to 9999.
    pub fn issue(&self, domain: &str, expiry: Expiry) -> LicenseResult<String> {
        let domain = domain.trim().to_ascii_lowercase();
        if !is_hostname(&domain) {
            return Err(LicenseError::InvalidDomain(domain));
        }
        if !expiry.is_representable() {
            return Err(LicenseError::InvalidExpiry(expiry.to_string()));
        }

        let payload = signed_payload(LICENSE_PREFIX, &domain, &expiry.to_string());
        let signature = self.signing_key.sign(payload.as_bytes());
        let encoded = SIGNATURE_ENGINE.encode(signature.to_bytes());

        info!(domain = %domain, expiry = %expiry, "issued license");
        Ok(format!("{payload}{DELIMITER}{encoded}"))
    }
}
