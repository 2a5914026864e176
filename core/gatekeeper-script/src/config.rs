//! Script configuration, read from `gatekeeper.toml`.
//!
//! The license key is stored here as opaque text; it is only interpreted
//! when the script is rendered.

use crate::error::{ScriptError, ScriptResult};
use gatekeeper_license::is_valid_format;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Where the watermark is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WatermarkPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
    Center,
    /// Repeated across the whole page.
    Tiled,
}

/// Watermark shown when the license does not check out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatermarkConfig {
    #[serde(default = "default_watermark_text")]
    pub text: String,
    #[serde(default = "default_watermark_opacity")]
    pub opacity: f32,
    #[serde(default)]
    pub position: WatermarkPosition,
}

fn default_watermark_text() -> String {
    "Unlicensed copy of Gatekeeper".to_string()
}

fn default_watermark_opacity() -> f32 {
    0.35
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            text: default_watermark_text(),
            opacity: default_watermark_opacity(),
            position: WatermarkPosition::default(),
        }
    }
}

/// Content protections applied by the script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectionConfig {
    #[serde(default = "default_true")]
    pub disable_right_click: bool,
    #[serde(default)]
    pub disable_text_selection: bool,
    #[serde(default = "default_true")]
    pub disable_keyboard_shortcuts: bool,
    #[serde(default = "default_true")]
    pub disable_image_drag: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ProtectionConfig {
    fn default() -> Self {
        Self {
            disable_right_click: true,
            disable_text_selection: false,
            disable_keyboard_shortcuts: true,
            disable_image_drag: true,
        }
    }
}

/// Top-level script configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GatekeeperConfig {
    /// Opaque license token.
    #[serde(default)]
    pub license_key: Option<String>,
    /// Domain the script is served for, used when a request carries none.
    #[serde(default)]
    pub site_domain: Option<String>,
    #[serde(default)]
    pub watermark: WatermarkConfig,
    #[serde(default)]
    pub protection: ProtectionConfig,
}

impl GatekeeperConfig {
    /// Parses and validates a TOML configuration.
    pub fn from_toml_str(text: &str) -> ScriptResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file. A missing file yields the defaults.
    pub fn load(path: &Path) -> ScriptResult<Self> {
        if !path.exists() {
            info!("No Gatekeeper config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        info!("Loaded Gatekeeper config from {}", path.display());
        Ok(config)
    }

    /// Writes the configuration as TOML.
    pub fn save(&self, path: &Path) -> ScriptResult<()> {
        self.validate()?;
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Rejects values the script cannot use.
    ///
    /// A license key that is not token-shaped is only warned about: the
    /// script still renders, with the watermark.
    pub fn validate(&self) -> ScriptResult<()> {
        if !(0.0..=1.0).contains(&self.watermark.opacity) {
            return Err(ScriptError::InvalidConfig(format!(
                "watermark opacity must be between 0 and 1, got {}",
                self.watermark.opacity
            )));
        }
        if self.watermark.text.trim().is_empty() {
            return Err(ScriptError::InvalidConfig("watermark text is empty".into()));
        }
        if let Some(key) = self.license_key.as_deref().filter(|k| !k.trim().is_empty()) {
            if !is_valid_format(key) {
                warn!("Configured license key is not in GF-<domain>-<expiry>-<signature> form");
            }
        }
        Ok(())
    }

    /// Returns the license key, treating blank text as absent.
    #[must_use]
    pub fn license_key(&self) -> &str {
        self.license_key.as_deref().map(str::trim).unwrap_or_default()
    }
}
