//! Bakes the license verdict and settings into the protection script.
//!
//! The rendered script carries `LICENSE_VALID` as a literal. An invalid,
//! missing, expired or mismatched license makes the script draw its
//! watermark; a valid one suppresses it.

use crate::config::{GatekeeperConfig, WatermarkPosition};
use crate::error::ScriptResult;
use gatekeeper_license::LicenseVerification;
use serde::Serialize;

const TEMPLATE: &str = include_str!("../assets/gatekeeper.js");
const CONFIG_PLACEHOLDER: &str = "/*__GATEKEEPER_CONFIG__*/";

/// Settings block embedded in the script.
#[derive(Debug, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct ScriptSettings<'a> {
    license_valid: bool,
    license_domain: Option<&'a str>,
    license_error: Option<String>,
    watermark_text: &'a str,
    watermark_opacity: f32,
    watermark_position: WatermarkPosition,
    disable_right_click: bool,
    disable_text_selection: bool,
    disable_keyboard_shortcuts: bool,
    disable_image_drag: bool,
}

/// Renders the script for `config` with the given license verdict.
pub fn render_script(config: &GatekeeperConfig, verdict: &LicenseVerification) -> ScriptResult<String> {
    let settings = ScriptSettings {
        license_valid: verdict.valid,
        license_domain: verdict.domain.as_deref(),
        license_error: verdict.error_message(),
        watermark_text: &config.watermark.text,
        watermark_opacity: config.watermark.opacity,
        watermark_position: config.watermark.position,
        disable_right_click: config.protection.disable_right_click,
        disable_text_selection: config.protection.disable_text_selection,
        disable_keyboard_shortcuts: config.protection.disable_keyboard_shortcuts,
        disable_image_drag: config.protection.disable_image_drag,
    };

    let json = serde_json::to_string_pretty(&settings)?;
    // Keep the block inert inside an inline <script> tag.
    let json = json.replace('<', "\\u003c");
    Ok(TEMPLATE.replacen(CONFIG_PLACEHOLDER, &json, 1))
}
