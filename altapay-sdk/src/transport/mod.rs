//! Transport abstraction.
//!
//! A [`Transport`] sends a [`RequestDescriptor`] and returns the raw response.
//! It knows nothing about options or XML; classifying what comes back is the
//! response layer's job. The one distinction it must preserve is between a
//! failure that still carries a response ([`TransportFailure::Status`]) and
//! one that does not ([`TransportFailure::Network`]).
//!
//! # Examples
//!
//! ```rust,no_run
//! use altapay_sdk::{
//!     auth::Authentication,
//!     options::OptionSchema,
//!     request::{self, HttpMethod, OperationMeta},
//!     transport::{HttpTransport, Transport},
//! };
//!
//! # async fn example() -> altapay_sdk::Result<()> {
//! let transport = HttpTransport::new()?;
//! let auth = Authentication::new("api_user", "secret");
//! let meta = OperationMeta {
//!     name: "testAuthentication",
//!     method: HttpMethod::Get,
//!     endpoint: "testAuthentication",
//! };
//! let resolved = OptionSchema::builder().build()?.resolve(&Default::default())?;
//!
//! let request = request::build(&meta, &resolved, &auth);
//! match transport.send(&request).await {
//!     Ok(response) => println!("status: {}", response.status),
//!     Err(failure) => println!("failed: {failure}"),
//! }
//! # Ok(())
//! # }
//! ```

#[allow(
    redundant_imports,
    reason = "Future needed for RPITIT despite being in Edition 2024 prelude"
)]
use std::future::Future;

use thiserror::Error;

use crate::request::RequestDescriptor;

pub mod config;
pub mod http;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
mod sealed;

pub use config::{HttpConfig, HttpVersion};
pub use http::HttpTransport;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockTransport;

/// Raw response as returned by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: Vec<(String, String)>,
    /// Raw response body bytes.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Creates a response without headers.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, headers: Vec::new(), body: body.into() }
    }

    /// Body decoded as UTF-8, with invalid sequences replaced.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Why a transport did not produce a successful response.
#[derive(Debug, Error)]
pub enum TransportFailure {
    /// No response arrived: DNS, connect, TLS or timeout failure.
    #[error("{message}")]
    Network {
        /// Description of the failure.
        message: String,
        /// Underlying client error.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The server answered with a non-2xx status. The body is retained.
    #[error("server returned status {}", .response.status)]
    Status {
        /// The complete response.
        response: RawResponse,
    },

    /// The request was refused before sending, e.g. by the URL policy.
    #[error("request refused: {0}")]
    Policy(String),
}

/// Sends requests to the gateway.
///
/// This trait is sealed; the crate ships [`HttpTransport`] and, with the
/// `mock` feature, [`MockTransport`].
pub trait Transport: sealed::private::Sealed + Send + Sync {
    /// Sends the request and returns the response.
    ///
    /// # Errors
    ///
    /// Returns [`TransportFailure::Status`] for non-2xx responses,
    /// [`TransportFailure::Network`] when no response arrived and
    /// [`TransportFailure::Policy`] when the request was not sent.
    fn send<'a>(
        &'a self,
        request: &'a RequestDescriptor,
    ) -> impl Future<Output = Result<RawResponse, TransportFailure>> + Send + 'a;

    /// Returns the protocol name for logging.
    fn protocol_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_response_success_range() {
        assert!(RawResponse::new(200, "").is_success());
        assert!(RawResponse::new(204, "").is_success());
        assert!(!RawResponse::new(199, "").is_success());
        assert!(!RawResponse::new(302, "").is_success());
        assert!(!RawResponse::new(500, "").is_success());
    }

    #[test]
    fn test_body_text_is_lossy() {
        let response = RawResponse::new(200, vec![b'o', b'k', 0xff]);
        assert_eq!(response.body_text(), "ok\u{fffd}");
    }

    #[test]
    fn test_status_failure_display() {
        let failure = TransportFailure::Status { response: RawResponse::new(404, "Not Found") };
        assert_eq!(failure.to_string(), "server returned status 404");
    }
}
