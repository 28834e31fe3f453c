//! Kiosk configuration DTO.
//!
//! Holds the backend base URL and the kiosk timings. Values missing from a
//! TOML document keep their defaults; environment overrides are applied by the
//! binary's bootstrap layer.

use std::time::Duration;

use anyhow::{bail, Context};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000/";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_RESET_DWELL: Duration = Duration::from_secs(8);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KioskConfig {
    /// Backend base URL, with or without a trailing slash.
    pub backend_url: String,
    /// Per-request timeout for backend calls.
    pub request_timeout: Duration,
    /// How long the success screen stays up.
    pub reset_dwell: Duration,
    /// Latest-order poll interval while on the check-in screen.
    pub poll_interval: Duration,
    /// Listen for phone numbers and check-in commands on the backend's
    /// socket.io channel.
    pub remote_input: bool,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            reset_dwell: DEFAULT_RESET_DWELL,
            poll_interval: DEFAULT_POLL_INTERVAL,
            remote_input: true,
        }
    }
}

impl KioskConfig {
    /// Create KioskConfig from a TOML value, keeping defaults for absent keys.
    ///
    /// ```toml
    /// [backend]
    /// url = "http://localhost:5000/"
    /// request_timeout_secs = 10
    ///
    /// [kiosk]
    /// reset_dwell_secs = 8
    /// poll_interval_secs = 60
    ///
    /// [remote]
    /// enabled = true
    /// ```
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let mut config = Self::default();
        let backend = toml_value.get("backend");
        let kiosk = toml_value.get("kiosk");

        if let Some(url) = backend.and_then(|b| b.get("url")).and_then(|v| v.as_str()) {
            config.backend_url = url.to_string();
        }
        if let Some(secs) = secs_field(backend, "request_timeout_secs")? {
            config.request_timeout = secs;
        }
        if let Some(secs) = secs_field(kiosk, "reset_dwell_secs")? {
            config.reset_dwell = secs;
        }
        if let Some(secs) = secs_field(kiosk, "poll_interval_secs")? {
            config.poll_interval = secs;
        }
        if let Some(enabled) = toml_value.get("remote").and_then(|r| r.get("enabled")) {
            config.remote_input = enabled
                .as_bool()
                .with_context(|| format!("remote.enabled must be a boolean, got {enabled}"))?;
        }
        Ok(config)
    }
}

fn secs_field(section: Option<&toml::Value>, key: &str) -> anyhow::Result<Option<Duration>> {
    let Some(value) = section.and_then(|s| s.get(key)) else {
        return Ok(None);
    };
    match value.as_integer() {
        Some(secs) if secs > 0 => Ok(Some(Duration::from_secs(secs as u64))),
        _ => bail!("{key} must be a positive integer, got {value}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_toml_reads_all_sections() {
        let value: toml::Value = toml::from_str(
            r#"
            [backend]
            url = "http://kiosk-backend:8080"
            request_timeout_secs = 3

            [kiosk]
            reset_dwell_secs = 5
            poll_interval_secs = 30
            "#,
        )
        .unwrap();

        let config = KioskConfig::from_toml(&value).unwrap();
        assert_eq!(config.backend_url, "http://kiosk-backend:8080");
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert_eq!(config.reset_dwell, Duration::from_secs(5));
        assert_eq!(config.poll_interval, Duration::from_secs(30));
    }

    #[test]
    fn from_toml_keeps_defaults_when_missing() {
        let value: toml::Value = toml::from_str("[backend]\n").unwrap();
        assert_eq!(KioskConfig::from_toml(&value).unwrap(), KioskConfig::default());
    }

    #[test]
    fn from_toml_reads_remote_switch() {
        let value: toml::Value = toml::from_str("[remote]\nenabled = false\n").unwrap();
        assert!(!KioskConfig::from_toml(&value).unwrap().remote_input);

        let value: toml::Value = toml::from_str("[remote]\nenabled = \"no\"\n").unwrap();
        assert!(KioskConfig::from_toml(&value).is_err());
    }

    #[test]
    fn from_toml_rejects_zero_interval() {
        let value: toml::Value = toml::from_str("[kiosk]\npoll_interval_secs = 0\n").unwrap();
        assert!(KioskConfig::from_toml(&value).is_err());
    }
}
