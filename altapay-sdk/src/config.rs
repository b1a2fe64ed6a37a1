//! Gateway client configuration.
//!
//! This module defines the TOML-deserializable configuration of a gateway
//! client: where the gateway lives, which API user to authenticate as and how
//! the HTTP transport behaves.
//!
//! ```toml
//! base_url = "https://myshop.altapaysecure.com"
//!
//! [auth]
//! username = "api_user"
//! password_env = "ALTAPAY_PASSWORD"
//!
//! [transport]
//! timeout_secs = 60
//! ```
//!
//! The password itself is never part of the file; `password_env` names the
//! environment variable that holds it.

use std::path::Path;

use serde::Deserialize;
use url::Url;

use crate::{
    auth::Authentication,
    error::{GatewayError, Result},
    transport::{HttpConfig, HttpTransport},
};

/// Root gateway configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Gateway base URL, without the API path.
    pub base_url: String,

    /// API user.
    pub auth: AuthSettings,

    /// HTTP transport settings.
    #[serde(default)]
    pub transport: HttpConfig,
}

/// API user settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AuthSettings {
    /// API user name.
    pub username: String,

    /// Environment variable holding the password.
    pub password_env: String,
}

impl GatewayConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if the document does not parse or
    /// fails [`validate`](Self::validate).
    ///
    /// # Examples
    ///
    /// ```
    /// use altapay_sdk::config::GatewayConfig;
    ///
    /// let config = GatewayConfig::from_toml(
    ///     r#"
    ///     base_url = "https://testgateway.altapaysecure.com"
    ///
    ///     [auth]
    ///     username = "api_user"
    ///     password_env = "ALTAPAY_PASSWORD"
    /// "#,
    /// )?;
    /// assert_eq!(config.transport.timeout_secs, 30);
    /// # Ok::<(), altapay_sdk::GatewayError>(())
    /// ```
    pub fn from_toml(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input)
            .map_err(|e| GatewayError::Config(format!("invalid configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if the file cannot be read, does not
    /// parse, or fails [`validate`](Self::validate).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path)
            .map_err(|e| GatewayError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml(&input)
    }

    /// Validates the configuration.
    ///
    /// This method checks for:
    /// - `base_url` must parse, use HTTPS and not point at a loopback host,
    ///   unless `transport.allow_insecure` is set
    /// - transport timeouts must be in range
    /// - `username` must not be empty
    /// - `password_env` must be a valid environment variable name
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            GatewayError::Config(format!("invalid base_url '{}': {e}", self.base_url))
        })?;
        self.transport
            .check_url(&url)
            .map_err(|message| GatewayError::Config(format!("base_url rejected: {message}")))?;
        self.transport.validate().map_err(|e| match e {
            GatewayError::TransportConfig(message) => GatewayError::Config(message),
            other => other,
        })?;

        if self.auth.username.trim().is_empty() {
            return Err(GatewayError::Config("auth.username cannot be empty".to_owned()));
        }
        validate_env_var_name(&self.auth.password_env)
    }

    /// Builds credentials, reading the password from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if the variable is unset or not UTF-8.
    pub fn authentication(&self) -> Result<Authentication> {
        self.authentication_with(|name| std::env::var(name).ok())
    }

    /// Builds credentials, looking the password up with `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if `lookup` finds nothing.
    pub fn authentication_with(
        &self,
        lookup: impl FnOnce(&str) -> Option<String>,
    ) -> Result<Authentication> {
        let name = &self.auth.password_env;
        let password = lookup(name).ok_or_else(|| {
            GatewayError::Config(format!("environment variable {name} is not set"))
        })?;
        Ok(Authentication::new(&self.auth.username, password).with_base_url(&self.base_url))
    }

    /// Builds an HTTP transport from the `[transport]` settings.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::TransportConfig`] if the client cannot be built.
    pub fn http_transport(&self) -> Result<HttpTransport> {
        HttpTransport::with_config(&self.transport)
    }
}

/// Validates an environment variable name.
fn validate_env_var_name(name: &str) -> Result<()> {
    let Some(first_char) = name.chars().next() else {
        return Err(GatewayError::Config(
            "environment variable name cannot be empty".to_owned(),
        ));
    };

    // Letters, digits and underscores, not starting with a digit
    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(GatewayError::Config(format!(
            "environment variable name must start with letter or underscore: {name}"
        )));
    }

    for ch in name.chars() {
        if !ch.is_ascii_alphanumeric() && ch != '_' {
            return Err(GatewayError::Config(format!(
                "environment variable name contains invalid character '{ch}': {name}"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::AuthProvider, transport::HttpVersion};

    const MINIMAL: &str = r#"
        base_url = "https://myshop.altapaysecure.com"

        [auth]
        username = "api_user"
        password_env = "ALTAPAY_PASSWORD"
    "#;

    #[test]
    fn test_minimal_config_uses_transport_defaults() {
        let config = GatewayConfig::from_toml(MINIMAL).unwrap();
        assert_eq!(config.base_url, "https://myshop.altapaysecure.com");
        assert_eq!(config.auth.username, "api_user");
        assert_eq!(config.transport, HttpConfig::default());
    }

    #[test]
    fn test_transport_table() {
        let toml = format!("{MINIMAL}\n[transport]\ntimeout_secs = 60\nhttp_version = \"http1\"\n");
        let config = GatewayConfig::from_toml(&toml).unwrap();
        assert_eq!(config.transport.timeout_secs, 60);
        assert_eq!(config.transport.http_version, HttpVersion::Http1);
        assert_eq!(config.http_transport().unwrap().config().timeout_secs, 60);
    }

    #[test]
    fn test_invalid_toml_syntax() {
        let result = GatewayConfig::from_toml("base_url = unclosed string");
        assert!(matches!(result, Err(GatewayError::Config(_))));
    }

    #[test]
    fn test_missing_auth_table() {
        let result = GatewayConfig::from_toml(r#"base_url = "https://gateway.example.com""#);
        assert!(matches!(result, Err(GatewayError::Config(_))));
    }

    #[test]
    fn test_plain_http_rejected_unless_insecure() {
        let toml = MINIMAL.replace("https://myshop.altapaysecure.com", "http://127.0.0.1:8080");
        assert!(GatewayConfig::from_toml(&toml).is_err());

        let toml = format!("{toml}\n[transport]\nallow_insecure = true\n");
        assert!(GatewayConfig::from_toml(&toml).is_ok());
    }

    #[test]
    fn test_timeout_out_of_range() {
        let toml = format!("{MINIMAL}\n[transport]\ntimeout_secs = 301\n");
        match GatewayConfig::from_toml(&toml) {
            Err(GatewayError::Config(message)) => assert!(message.contains("timeout_secs")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_env_var_name_validation() {
        assert!(validate_env_var_name("ALTAPAY_PASSWORD").is_ok());
        assert!(validate_env_var_name("_PASS2").is_ok());
        assert!(validate_env_var_name("").is_err());
        assert!(validate_env_var_name("2PASS").is_err());
        assert!(validate_env_var_name("PASS-WORD").is_err());

        let toml = MINIMAL.replace("ALTAPAY_PASSWORD", "ALTAPAY PASSWORD");
        assert!(GatewayConfig::from_toml(&toml).is_err());
    }

    #[test]
    fn test_authentication_from_lookup() {
        let config = GatewayConfig::from_toml(MINIMAL).unwrap();
        let auth = config
            .authentication_with(|name| (name == "ALTAPAY_PASSWORD").then(|| "secret".to_owned()))
            .unwrap();
        assert_eq!(auth.username(), "api_user");
        assert_eq!(auth.base_url(), "https://myshop.altapaysecure.com");

        let error = config.authentication_with(|_| None).unwrap_err();
        assert!(error.to_string().contains("ALTAPAY_PASSWORD"));
    }
}
