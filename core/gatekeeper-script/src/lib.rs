//! Gatekeeper protection script rendering.
//!
//! The storefront serves a small script that applies content protections
//! and, unless the configured license checks out for the requesting domain,
//! draws a watermark. This crate:
//! - loads the script settings from `gatekeeper.toml`
//! - bakes the license verdict into the script as `LICENSE_VALID`
//! - caches rendered scripts behind an explicit TTL cache

mod cache;
mod config;
mod error;
mod render;
mod service;

pub use cache::{CacheKey, ScriptCache, DEFAULT_CAPACITY, DEFAULT_TTL};
pub use config::{GatekeeperConfig, ProtectionConfig, WatermarkConfig, WatermarkPosition};
pub use error::{ScriptError, ScriptResult};
pub use render::render_script;
pub use service::ScriptService;
