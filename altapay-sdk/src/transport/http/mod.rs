//! reqwest-backed transport to the gateway.
//!
//! Error statuses keep their body so the classifier can read the gateway's
//! error envelope.

use std::sync::LazyLock;

use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use super::config::{HttpConfig, HttpVersion};
use crate::{
    error::{GatewayError, Result},
    request::{HttpMethod, RequestDescriptor},
    transport::{RawResponse, Transport, TransportFailure, sealed},
};

/// Pooled client shared by every [`HttpTransport::new`] instance.
static DEFAULT_HTTP_CLIENT: LazyLock<std::result::Result<Client, String>> =
    LazyLock::new(|| build_client(&HttpConfig::default()).map_err(|e| e.to_string()));

fn build_client(config: &HttpConfig) -> std::result::Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .timeout(config.timeout())
        .connect_timeout(config.connect_timeout());

    builder = match config.http_version {
        HttpVersion::Http1 => builder.http1_only(),
        HttpVersion::Http2 => builder.http2_prior_knowledge(),
        HttpVersion::Auto => builder,
    };

    builder.build()
}

/// Rejects CR, LF and NUL in header names and values.
fn validate_header(name: &str, value: &str) -> std::result::Result<(), TransportFailure> {
    if name.contains(['\r', '\n', '\0']) {
        return Err(TransportFailure::Policy(
            "invalid header name: control characters not allowed".to_owned(),
        ));
    }
    if value.contains(['\r', '\n', '\0']) {
        return Err(TransportFailure::Policy(format!(
            "invalid value for header '{name}': control characters not allowed"
        )));
    }
    Ok(())
}

fn network_failure(context: &str, error: reqwest::Error) -> TransportFailure {
    if error.is_builder() {
        return TransportFailure::Policy(format!("{context}: {error}"));
    }
    TransportFailure::Network { message: format!("{context}: {error}"), source: Some(Box::new(error)) }
}

/// Sends requests to the gateway with reqwest.
///
/// Refuses plain HTTP and loopback targets unless the configuration sets
/// `allow_insecure`. Non-2xx responses are returned as
/// [`TransportFailure::Status`] with the body intact.
///
/// # Examples
///
/// ```
/// use altapay_sdk::transport::{HttpConfig, HttpTransport, HttpVersion, Transport};
///
/// let config = HttpConfig { timeout_secs: 60, http_version: HttpVersion::Http1, ..Default::default() };
/// let transport = HttpTransport::with_config(&config)?;
/// assert_eq!(transport.protocol_name(), "http/1.1");
/// # Ok::<(), altapay_sdk::GatewayError>(())
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: HttpConfig,
}

impl sealed::private::Sealed for HttpTransport {}

impl HttpTransport {
    /// Transport with [`HttpConfig::default`] on the shared client.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::TransportConfig`] if the shared client could
    /// not be built.
    pub fn new() -> Result<Self> {
        let client = DEFAULT_HTTP_CLIENT.clone().map_err(GatewayError::TransportConfig)?;
        Ok(Self { client, config: HttpConfig::default() })
    }

    /// Transport with its own client built from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::TransportConfig`] if the configuration is out of
    /// range or the HTTP client cannot be built.
    pub fn with_config(config: &HttpConfig) -> Result<Self> {
        config.validate()?;
        let client = build_client(config)
            .map_err(|e| GatewayError::TransportConfig(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { client, config: config.clone() })
    }

    /// Returns the configuration this transport was built with.
    #[must_use]
    pub const fn config(&self) -> &HttpConfig {
        &self.config
    }

    #[instrument(
        skip(self, request),
        fields(method = %request.method, path = %request.path)
    )]
    async fn execute_request(
        &self,
        request: &RequestDescriptor,
    ) -> std::result::Result<RawResponse, TransportFailure> {
        let target = request.target_url();
        let url = Url::parse(&target)
            .map_err(|e| TransportFailure::Policy(format!("invalid URL '{}': {e}", request.url)))?;
        self.config.check_url(&url).map_err(TransportFailure::Policy)?;

        for (name, value) in &request.headers {
            validate_header(name, value)?;
        }

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body() {
            builder = builder.body(body.to_owned());
        }

        let response = builder.send().await.map_err(|e| network_failure("request failed", e))?;

        let status = response.status().as_u16();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_owned()))
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| network_failure("cannot read response body", e))?
            .to_vec();

        debug!(status, body_len = body.len(), "response received");

        let response = RawResponse { status, headers, body };
        if response.is_success() {
            Ok(response)
        } else {
            Err(TransportFailure::Status { response })
        }
    }
}

impl Transport for HttpTransport {
    async fn send<'a>(
        &'a self,
        request: &'a RequestDescriptor,
    ) -> std::result::Result<RawResponse, TransportFailure> {
        self.execute_request(request).await
    }

    fn protocol_name(&self) -> &'static str {
        match self.config.http_version {
            HttpVersion::Http1 => "http/1.1",
            HttpVersion::Http2 => "http/2",
            HttpVersion::Auto => "http",
        }
    }
}
