//! Commands behind the `gatekeeper` operator tool.
//!
//! Each command returns its output as a string so the binary stays a thin
//! argument-parsing shell.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use gatekeeper_license::{
    extract_domain, is_valid_format, Expiry, LicenseIssuer, LicenseValidator, LicenseVerifier,
    SystemClock,
};
use gatekeeper_script::{GatekeeperConfig, ScriptService, ScriptCache};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Outcome of the `validate` command.
#[derive(Debug)]
pub struct ValidateOutput {
    pub valid: bool,
    pub report: String,
}

fn validator(public_key: Option<&str>) -> Result<LicenseValidator<SystemClock>> {
    let verifier = match public_key {
        Some(hex) => LicenseVerifier::from_public_key_hex(hex).context("invalid --public-key")?,
        None => LicenseVerifier::embedded(),
    };
    Ok(LicenseValidator::new(verifier, SystemClock))
}

/// Validates a token, optionally for a domain or page URL.
pub fn validate(token: &str, domain: Option<&str>, public_key: Option<&str>, json: bool) -> Result<ValidateOutput> {
    let verdict = validator(public_key)?.validate(token, domain);
    debug!(valid = verdict.valid, code = ?verdict.error_code(), "validated license");

    let report = if json {
        serde_json::to_string_pretty(&verdict)?
    } else {
        let mut lines = vec![format!("valid:       {}", verdict.valid)];
        if let Some(domain) = &verdict.domain {
            lines.push(format!("domain:      {domain}"));
        }
        if let Some(expiry) = &verdict.expiry {
            lines.push(format!("expiry:      {expiry}"));
        }
        lines.push(format!("expired:     {}", verdict.is_expired));
        lines.push(format!("domainMatch: {}", verdict.domain_match));
        if let (Some(message), Some(code)) = (verdict.error_message(), verdict.error_code()) {
            lines.push(format!("error:       {message} ({code})"));
        }
        lines.join("\n")
    };

    Ok(ValidateOutput {
        valid: verdict.valid,
        report,
    })
}

/// Structural check only; no signature verification.
pub fn check_format(token: &str) -> bool {
    is_valid_format(token)
}

/// Extracts the hostname from a URL or bare hostname.
pub fn extract(input: &str) -> Option<String> {
    extract_domain(input)
}

/// Generates a key pair, writing the hex secret to `out`.
///
/// Returns the public key as hex and as a Rust byte array for embedding.
pub fn keygen(out: &Path) -> Result<String> {
    if out.exists() {
        bail!("refusing to overwrite existing key file {}", out.display());
    }

    let issuer = LicenseIssuer::generate();
    fs::write(out, hex::encode(issuer.secret_bytes()))
        .with_context(|| format!("unable to write secret key {}", out.display()))?;
    info!("Wrote secret key to {}", out.display());

    let public = issuer.public_key_bytes();
    let array = public.iter().map(u8::to_string).collect::<Vec<_>>().join(", ");
    Ok(format!("public key (hex): {}\npublic key (bytes): [{array}]", hex::encode(public)))
}

fn load_issuer(secret_path: &Path) -> Result<LicenseIssuer> {
    let text = fs::read_to_string(secret_path)
        .with_context(|| format!("unable to read secret key {}", secret_path.display()))?;
    let mut secret = [0u8; 32];
    hex::decode_to_slice(text.trim(), &mut secret)
        .with_context(|| format!("secret key {} is not 64 hex characters", secret_path.display()))?;
    Ok(LicenseIssuer::from_secret_bytes(&secret))
}

/// Resolves `--expires` / `--days` into an expiry. Neither means unlimited.
pub fn resolve_expiry(expires: Option<&str>, days: Option<u64>, today: NaiveDate) -> Result<Expiry> {
    match (expires, days) {
        (Some(_), Some(_)) => bail!("use either --expires or --days, not both"),
        (Some(text), None) => {
            Expiry::parse(text).with_context(|| format!("expiry {text:?} is not UNLIMITED or a valid YYYYMMDD date"))
        }
        (None, Some(days)) => Ok(Expiry::after_days(today, days)),
        (None, None) => Ok(Expiry::Unlimited),
    }
}

/// Issues a token signed with the secret at `secret_path`.
pub fn issue(secret_path: &Path, domain: &str, expiry: Expiry) -> Result<String> {
    let issuer = load_issuer(secret_path)?;
    let token = issuer.issue(domain, expiry)?;
    Ok(token)
}

/// Renders the protection script for the config at `config_path`.
pub fn render(config_path: &Path, domain: Option<&str>, public_key: Option<&str>) -> Result<String> {
    let config = GatekeeperConfig::load(config_path)
        .with_context(|| format!("unable to load config {}", config_path.display()))?;
    let service = ScriptService::new(validator(public_key)?, ScriptCache::default());
    let script = service.script_for(&config, domain)?;
    Ok(script.to_string())
}
