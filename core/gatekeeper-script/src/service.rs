//! Serves rendered scripts: validates the configured license for the
//! requesting domain, renders, and caches the result.

use crate::cache::{CacheKey, ScriptCache};
use crate::config::GatekeeperConfig;
use crate::error::ScriptResult;
use crate::render::render_script;
use gatekeeper_license::{Clock, LicenseValidator, SystemClock};
use std::sync::Arc;
use tracing::{info, warn};

/// Produces protection scripts for incoming requests.
#[derive(Debug)]
pub struct ScriptService<C = SystemClock> {
    validator: LicenseValidator<C>,
    cache: ScriptCache,
}

impl ScriptService<SystemClock> {
    /// Service using the embedded public key and a default cache.
    pub fn embedded() -> Self {
        Self::new(LicenseValidator::embedded(), ScriptCache::default())
    }
}

impl<C: Clock> ScriptService<C> {
    pub fn new(validator: LicenseValidator<C>, cache: ScriptCache) -> Self {
        Self { validator, cache }
    }

    pub fn cache(&self) -> &ScriptCache {
        &self.cache
    }

    /// Returns the script for a request from `request_domain` (a hostname
    /// or page URL). Falls back to the configured site domain.
    pub fn script_for(
        &self,
        config: &GatekeeperConfig,
        request_domain: Option<&str>,
    ) -> ScriptResult<Arc<str>> {
        let domain = request_domain
            .filter(|d| !d.trim().is_empty())
            .or(config.site_domain.as_deref());
        let key = CacheKey::new(config.license_key(), domain);

        self.cache.get_or_render(key, || {
            let verdict = self.validator.validate(config.license_key(), domain);
            match verdict.error_message() {
                None => info!(domain = ?verdict.domain, "license valid, watermark suppressed"),
                Some(reason) => warn!(reason = %reason, "license rejected, watermark enabled"),
            }
            render_script(config, &verdict)
        })
    }

    /// Call after the stored settings or license key change.
    pub fn settings_changed(&self) {
        self.cache.invalidate_all();
    }
}
