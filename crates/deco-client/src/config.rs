// ============================================
// File: crates/deco-client/src/config.rs
// ============================================
//! # Client Configuration
//!
//! ## Creation Reason
//! Holds the per-client device address and HTTP settings, loaded from
//! TOML or built from defaults and CLI flags.
//!
//! ## Configuration Sections
//! - `device`: host, scheme, base path, account name
//! - `http`: request timeout
//! - `logging`: log level
//!
//! ## Example Configuration
//! ```toml
//! [device]
//! host = "192.168.68.1"
//! scheme = "http"
//! base_path = "/cgi-bin/luci/"
//! account = "admin"
//!
//! [http]
//! request_timeout_secs = 10
//!
//! [logging]
//! level = "info"
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - The password is deliberately not part of the config file; it comes
//!   from `--password` or `DECO_PASSWORD`
//! - The device address is fixed for the lifetime of a `DecoClient`
//!
//! ## Last Modified
//! v0.1.0 - Initial configuration implementation

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ClientError, Result};

// ============================================
// ClientConfig
// ============================================

/// Main client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Device address and account.
    #[serde(default)]
    pub device: DeviceConfig,

    /// HTTP settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ClientConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    /// Returns `ConfigLoad` if the file cannot be read or parsed, or
    /// `ConfigInvalid` if validation fails.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        info!("Loading configuration from: {}", path_str);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ClientError::config_load(&path_str, e.to_string()))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ClientError::config_load(&path_str, e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a string.
    ///
    /// # Errors
    /// Same as [`ClientConfig::load`].
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ClientError::config_load("<string>", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Creates a default configuration pointing at `host`.
    pub fn for_host(host: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.device.host = host.into();
        config
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns `ConfigInvalid` naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        self.device.validate()?;
        self.http.validate()?;
        Ok(())
    }

    /// Serializes configuration to a TOML string.
    #[must_use]
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    /// Base URL all requests are resolved against,
    /// e.g. `http://tplinkdeco.net/cgi-bin/luci/`.
    #[must_use]
    pub fn base_url(&self) -> String {
        let path = self.device.base_path.trim_matches('/');
        if path.is_empty() {
            format!("{}://{}/", self.device.scheme, self.device.host)
        } else {
            format!("{}://{}/{}/", self.device.scheme, self.device.host, path)
        }
    }

    /// Timeout for one full round trip.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.http.request_timeout_secs)
    }
}

// ============================================
// DeviceConfig
// ============================================

/// Device address section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Host name or IP of the main node.
    #[serde(default = "default_host")]
    pub host: String,

    /// `http` or `https`.
    #[serde(default = "default_scheme")]
    pub scheme: String,

    /// Path of the management API below the host.
    #[serde(default = "default_base_path")]
    pub base_path: String,

    /// Account name combined with the password in the credential hash.
    #[serde(default = "default_account")]
    pub account: String,
}

fn default_host() -> String {
    "tplinkdeco.net".to_string()
}

fn default_scheme() -> String {
    "http".to_string()
}

fn default_base_path() -> String {
    "/cgi-bin/luci/".to_string()
}

fn default_account() -> String {
    deco_core::crypto::DEFAULT_ACCOUNT.to_string()
}

impl DeviceConfig {
    fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(ClientError::config_invalid("device.host", "cannot be empty"));
        }
        if self
            .host
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#'))
        {
            return Err(ClientError::config_invalid(
                "device.host",
                "must be a bare host name or IP",
            ));
        }
        if !matches!(self.scheme.as_str(), "http" | "https") {
            return Err(ClientError::config_invalid(
                "device.scheme",
                format!("unsupported scheme '{}'", self.scheme),
            ));
        }
        if !self.base_path.starts_with('/') {
            return Err(ClientError::config_invalid(
                "device.base_path",
                "must start with '/'",
            ));
        }
        if self.account.is_empty() {
            return Err(ClientError::config_invalid("device.account", "cannot be empty"));
        }
        Ok(())
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            scheme: default_scheme(),
            base_path: default_base_path(),
            account: default_account(),
        }
    }
}

// ============================================
// HttpConfig
// ============================================

/// HTTP section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Timeout for one round trip, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    10
}

impl HttpConfig {
    fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 {
            return Err(ClientError::config_invalid(
                "http.request_timeout_secs",
                "must be greater than 0",
            ));
        }
        Ok(())
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
        }
    }
}

// ============================================
// LoggingConfig
// ============================================

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ============================================
// Tests
// ============================================
