//! # Configuration Loader
//!
//! Reads the optional TOML file and applies environment overrides.
//! Range checks live in `KioskConfig::from_toml` and in the override parser;
//! this module only knows where values come from.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use kc_core::KioskConfig;

/// Environment variable naming the TOML config file.
pub const CONFIG_PATH_ENV: &str = "KIOSK_CONFIG";
pub const BACKEND_URL_ENV: &str = "BACKEND_URL";
pub const REQUEST_TIMEOUT_ENV: &str = "KIOSK_REQUEST_TIMEOUT_SECS";
pub const RESET_DWELL_ENV: &str = "KIOSK_RESET_DWELL_SECS";
pub const POLL_INTERVAL_ENV: &str = "KIOSK_POLL_INTERVAL_SECS";
pub const REMOTE_INPUT_ENV: &str = "KIOSK_REMOTE_INPUT";

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns error if the file cannot be read, is not valid TOML, or holds
/// a timing that is not a positive integer.
pub fn load_config(config_path: &Path) -> anyhow::Result<KioskConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    KioskConfig::from_toml(&toml_value)
        .with_context(|| format!("Invalid config file: {}", config_path.display()))
}

/// Resolve the effective configuration from the process environment.
pub fn resolve_config() -> anyhow::Result<KioskConfig> {
    resolve_with(|key| std::env::var(key).ok())
}

fn resolve_with(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<KioskConfig> {
    let config = match lookup(CONFIG_PATH_ENV) {
        Some(path) if !path.trim().is_empty() => load_config(&PathBuf::from(path))?,
        _ => KioskConfig::default(),
    };
    apply_env_overrides(config, lookup)
}

fn apply_env_overrides(
    mut config: KioskConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<KioskConfig> {
    if let Some(url) = lookup(BACKEND_URL_ENV).filter(|url| !url.trim().is_empty()) {
        config.backend_url = url.trim().to_string();
    }
    if let Some(timeout) = secs_override(&lookup, REQUEST_TIMEOUT_ENV)? {
        config.request_timeout = timeout;
    }
    if let Some(dwell) = secs_override(&lookup, RESET_DWELL_ENV)? {
        config.reset_dwell = dwell;
    }
    if let Some(interval) = secs_override(&lookup, POLL_INTERVAL_ENV)? {
        config.poll_interval = interval;
    }
    if let Some(raw) = lookup(REMOTE_INPUT_ENV) {
        config.remote_input = match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => bail!("{REMOTE_INPUT_ENV} must be true or false, got {raw:?}"),
        };
    }
    Ok(config)
}

fn secs_override(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> anyhow::Result<Option<Duration>> {
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let secs: u64 = raw
        .trim()
        .parse()
        .with_context(|| format!("{key} must be a whole number of seconds, got {raw:?}"))?;
    if secs == 0 {
        bail!("{key} must be greater than zero");
    }
    Ok(Some(Duration::from_secs(secs)))
}
