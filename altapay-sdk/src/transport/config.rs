//! HTTP transport configuration.
//!
//! Deserialized from the `[transport]` table of the gateway configuration.

use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::error::{GatewayError, Result};

/// Settings of the reqwest client behind [`HttpTransport`](super::HttpTransport).
///
/// Every field has a default, so an absent `[transport]` table is valid.
///
/// # Examples
///
/// ```toml
/// [transport]
/// timeout_secs = 60
/// http_version = "http1"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct HttpConfig {
    /// Idle connections kept open to the gateway.
    #[serde(default = "default_pool_max_idle")]
    pub pool_max_idle_per_host: usize,

    /// Whole-call timeout, seconds. Allowed range 1..=300.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// TCP and TLS connect timeout, seconds. Allowed range 1..=60.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Protocol selection.
    #[serde(default)]
    pub http_version: HttpVersion,

    /// Permits plain HTTP and loopback hosts.
    ///
    /// Meant for local test servers only.
    #[serde(default)]
    pub allow_insecure: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            pool_max_idle_per_host: default_pool_max_idle(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            http_version: HttpVersion::default(),
            allow_insecure: false,
        }
    }
}

impl HttpConfig {
    /// Checks both timeouts against their allowed ranges.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::TransportConfig`] naming the field out of range.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(GatewayError::TransportConfig(
                "timeout_secs must be between 1 and 300".to_owned(),
            ));
        }
        if self.connect_timeout_secs == 0 || self.connect_timeout_secs > 60 {
            return Err(GatewayError::TransportConfig(
                "connect_timeout_secs must be between 1 and 60".to_owned(),
            ));
        }
        Ok(())
    }

    /// Whole-call timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Connect timeout.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Checks a URL against the HTTPS-only, no-loopback policy.
    ///
    /// Everything passes when `allow_insecure` is set.
    ///
    /// # Errors
    ///
    /// Returns a description of the violated rule.
    pub fn check_url(&self, url: &Url) -> std::result::Result<(), String> {
        if self.allow_insecure {
            return Ok(());
        }
        if url.scheme() != "https" {
            return Err(format!("only HTTPS URLs are allowed, got scheme '{}'", url.scheme()));
        }
        if let Some(host) = url.host_str() {
            let host = host.to_lowercase();
            if host == "localhost" || host.starts_with("127.") || host == "[::1]" || host == "::1" {
                return Err(format!("loopback host '{host}' is not allowed"));
            }
        }
        Ok(())
    }
}

/// Which HTTP versions the client may speak.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HttpVersion {
    /// `http1`: HTTP/1.1 only.
    Http1,
    /// `http2`: HTTP/2 with prior knowledge; the gateway must accept h2c or h2.
    Http2,
    /// `auto`: negotiated per connection.
    #[default]
    Auto,
}

fn default_pool_max_idle() -> usize {
    100
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_config_default() {
        let config = HttpConfig::default();
        assert_eq!(config.pool_max_idle_per_host, 100);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
        assert_eq!(config.http_version, HttpVersion::Auto);
        assert!(!config.allow_insecure);
    }

    #[test]
    fn test_http_config_from_toml() {
        let toml = "
            timeout_secs = 45
            http_version = \"http1\"
            allow_insecure = true
        ";

        let config: HttpConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.pool_max_idle_per_host, 100);
        assert_eq!(config.timeout_secs, 45);
        assert_eq!(config.connect_timeout_secs, 10);
        assert_eq!(config.http_version, HttpVersion::Http1);
        assert!(config.allow_insecure);
    }

    #[test]
    fn test_validate_timeout_bounds() {
        assert!(HttpConfig::default().validate().is_ok());

        let config = HttpConfig { timeout_secs: 0, ..Default::default() };
        assert!(config.validate().is_err());

        let config = HttpConfig { timeout_secs: 301, ..Default::default() };
        assert!(config.validate().is_err());

        let config = HttpConfig { connect_timeout_secs: 61, ..Default::default() };
        let error = config.validate().unwrap_err();
        assert!(error.to_string().contains("connect_timeout_secs"));
    }

    #[test]
    fn test_url_policy() {
        let config = HttpConfig::default();
        let check = |raw: &str| config.check_url(&Url::parse(raw).unwrap());

        assert!(check("https://testgateway.altapaysecure.com").is_ok());
        assert!(check("http://testgateway.altapaysecure.com").is_err());
        assert!(check("https://localhost:8443").is_err());
        assert!(check("https://127.0.0.2").is_err());
        assert!(check("https://[::1]:8443").is_err());
    }

    #[test]
    fn test_url_policy_allow_insecure() {
        let config = HttpConfig { allow_insecure: true, ..Default::default() };
        assert!(config.check_url(&Url::parse("http://127.0.0.1:9000").unwrap()).is_ok());
    }
}
