//! Gateway credentials.
//!
//! The gateway authenticates every call with HTTP Basic credentials of an API
//! user. [`Authentication`] holds them together with the gateway base URL and
//! hands the request builder its headers through [`AuthProvider`].

use std::fmt;

use base64::{Engine, engine::general_purpose::STANDARD};
use zeroize::Zeroizing;

/// Base URL of the AltaPay test gateway.
pub const DEFAULT_BASE_URL: &str = "https://testgateway.altapaysecure.com";

/// Header identifying the client library to the gateway.
pub const CLIENT_VERSION_HEADER: &str = "x-altapay-client-version";

/// Supplies the base URL and headers every request carries.
pub trait AuthProvider: Send + Sync {
    /// Gateway base URL, without the API path.
    fn base_url(&self) -> &str;

    /// Headers added to every request, in order.
    fn basic_headers(&self) -> Vec<(String, String)>;
}

/// API user credentials.
///
/// # Examples
///
/// ```
/// use altapay_sdk::auth::{AuthProvider, Authentication};
///
/// let auth = Authentication::new("api_user", "secret")
///     .with_base_url("https://myshop.altapaysecure.com");
/// assert_eq!(auth.base_url(), "https://myshop.altapaysecure.com");
/// assert!(!format!("{auth:?}").contains("secret"));
/// ```
#[derive(Clone)]
pub struct Authentication {
    username: String,
    password: Zeroizing<String>,
    base_url: String,
}

impl Authentication {
    /// Creates credentials for the test gateway.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Zeroizing::new(password.into()),
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }

    /// Points the credentials at another gateway.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// API user name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    fn authorization(&self) -> String {
        let credentials = Zeroizing::new(format!("{}:{}", self.username, self.password.as_str()));
        format!("Basic {}", STANDARD.encode(credentials.as_bytes()))
    }
}

impl fmt::Debug for Authentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authentication")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl AuthProvider for Authentication {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn basic_headers(&self) -> Vec<(String, String)> {
        vec![
            ("Authorization".to_owned(), self.authorization()),
            (
                CLIENT_VERSION_HEADER.to_owned(),
                format!("RUSTSDK/{}", env!("CARGO_PKG_VERSION")),
            ),
        ]
    }
}
