use chrono::{TimeZone, Utc};
use gatekeeper_license::{Expiry, FixedClock, LicenseIssuer, LicenseValidator};
use gatekeeper_script::{GatekeeperConfig, ScriptCache, ScriptService};
use std::time::Duration;

fn service_for(issuer: &LicenseIssuer) -> ScriptService<FixedClock> {
    let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
    ScriptService::new(
        LicenseValidator::new(issuer.verifier(), FixedClock(now)),
        ScriptCache::new(Duration::from_secs(300)),
    )
}

fn config_with(license_key: &str) -> GatekeeperConfig {
    GatekeeperConfig {
        license_key: Some(license_key.to_string()),
        site_domain: Some("shop.example.com".into()),
        ..GatekeeperConfig::default()
    }
}

#[test]
fn valid_license_suppresses_watermark() {
    let issuer = LicenseIssuer::generate();
    let token = issuer.issue("*.example.com", Expiry::Unlimited).unwrap();
    let service = service_for(&issuer);

    let script = service.script_for(&config_with(&token), Some("https://app.example.com/checkout")).unwrap();
    assert!(script.contains("\"LICENSE_VALID\": true"));
    assert!(!script.contains("LICENSE_ERROR\": \""));
}

#[test]
fn configured_site_domain_is_the_fallback() {
    let issuer = LicenseIssuer::generate();
    let token = issuer.issue("other.com", Expiry::Unlimited).unwrap();
    let service = service_for(&issuer);

    let script = service.script_for(&config_with(&token), None).unwrap();
    assert!(script.contains("\"LICENSE_VALID\": false"));
    assert!(script.contains("License is for domain other.com, not shop.example.com"));
}

#[test]
fn missing_license_renders_watermark() {
    let issuer = LicenseIssuer::generate();
    let service = service_for(&issuer);
    let script = service.script_for(&GatekeeperConfig::default(), Some("example.com")).unwrap();
    assert!(script.contains("\"LICENSE_VALID\": false"));
    assert!(script.contains("No license key provided"));
}

#[test]
fn expired_license_renders_watermark() {
    let issuer = LicenseIssuer::generate();
    let token = issuer
        .issue("example.com", Expiry::parse("20260101").unwrap())
        .unwrap();
    let script = service_for(&issuer).script_for(&config_with(&token), Some("example.com")).unwrap();
    assert!(script.contains("License has expired"));
}

#[test]
fn scripts_are_cached_per_domain() {
    let issuer = LicenseIssuer::generate();
    let token = issuer.issue("example.com", Expiry::Unlimited).unwrap();
    let service = service_for(&issuer);
    let config = config_with(&token);

    let first = service.script_for(&config, Some("example.com")).unwrap();
    let second = service.script_for(&config, Some("EXAMPLE.com")).unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));

    service.script_for(&config, Some("other.com")).unwrap();
    assert_eq!(service.cache().len(), 2);

    service.settings_changed();
    assert!(service.cache().is_empty());
}

#[test]
fn pages_on_one_host_share_a_cache_entry() {
    let issuer = LicenseIssuer::generate();
    let token = issuer.issue("example.com", Expiry::Unlimited).unwrap();
    let service = service_for(&issuer);
    let config = config_with(&token);

    for i in 0..50 {
        let url = format!("https://example.com/p/{i}?utm={i}");
        let script = service.script_for(&config, Some(&url)).unwrap();
        assert!(script.contains("\"LICENSE_VALID\": true"));
    }
    assert_eq!(service.cache().len(), 1);
}

#[test]
fn cache_size_is_bounded() {
    let issuer = LicenseIssuer::generate();
    let token = issuer.issue("*.example.com", Expiry::Unlimited).unwrap();
    let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
    let service = ScriptService::new(
        LicenseValidator::new(issuer.verifier(), FixedClock(now)),
        ScriptCache::with_capacity(Duration::from_secs(300), 8),
    );
    let config = config_with(&token);

    for i in 0..100 {
        service.script_for(&config, Some(&format!("site{i}.example.com"))).unwrap();
    }
    assert_eq!(service.cache().len(), 8);
}

#[test]
fn config_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gatekeeper.toml");

    let mut config = GatekeeperConfig::default();
    config.license_key = Some("GF-example.com-UNLIMITED-abc".into());
    config.watermark.text = "Demo".into();
    config.save(&path).unwrap();

    let loaded = GatekeeperConfig::load(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn missing_config_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let loaded = GatekeeperConfig::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(loaded, GatekeeperConfig::default());
}
