//! Request construction.
//!
//! [`build`] turns resolved parameters and static operation metadata into a
//! [`RequestDescriptor`] that fully determines the wire request. Nothing here
//! touches the network.

use std::fmt;

use crate::{auth::AuthProvider, options::ResolvedParameters};

mod encode;

pub use encode::{decode, encode, flatten};

/// Path prefix shared by every merchant API endpoint.
pub const API_PATH: &str = "/merchant/API";

/// Content type of POST bodies.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP method of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// Parameters in the query string.
    Get,
    /// Parameters in a form-encoded body.
    Post,
}

impl HttpMethod {
    /// Returns the method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How [`RequestDescriptor::query_or_body`] is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    /// Sent as an `application/x-www-form-urlencoded` body.
    FormUrlEncoded,
    /// No body; the encoded parameters form the query string.
    None,
}

/// Static description of an operation's endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationMeta {
    /// Operation name used in logs.
    pub name: &'static str,
    /// HTTP method.
    pub method: HttpMethod,
    /// Endpoint below [`API_PATH`], e.g. `createInvoiceReservation`.
    pub endpoint: &'static str,
}

impl OperationMeta {
    /// Returns the absolute request path.
    #[must_use]
    pub fn path(&self) -> String {
        format!("{API_PATH}/{}", self.endpoint)
    }
}

/// A transport-ready request.
#[derive(Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute URL without query string.
    pub url: String,
    /// Request path without query string.
    pub path: String,
    /// Headers in the order they are sent.
    pub headers: Vec<(String, String)>,
    /// Whether `query_or_body` is the body or the query string.
    pub body_encoding: BodyEncoding,
    /// Form-encoded parameters.
    pub query_or_body: String,
}

impl RequestDescriptor {
    /// Returns the URL to send to, with the query string for GET requests.
    #[must_use]
    pub fn target_url(&self) -> String {
        match self.body_encoding {
            BodyEncoding::None if !self.query_or_body.is_empty() => {
                format!("{}?{}", self.url, self.query_or_body)
            }
            _ => self.url.clone(),
        }
    }

    /// Returns the request body, if the method carries one.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self.body_encoding {
            BodyEncoding::FormUrlEncoded => Some(&self.query_or_body),
            BodyEncoding::None => None,
        }
    }

    /// Looks up a header, ignoring ASCII case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Decodes the parameters back into flat key/value pairs.
    #[must_use]
    pub fn parameters(&self) -> Vec<(String, String)> {
        decode(&self.query_or_body)
    }
}

impl fmt::Debug for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(key, value)| {
                if key.eq_ignore_ascii_case("authorization") {
                    (key.as_str(), "[REDACTED]")
                } else {
                    (key.as_str(), value.as_str())
                }
            })
            .collect();
        f.debug_struct("RequestDescriptor")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("path", &self.path)
            .field("headers", &headers)
            .field("body_encoding", &self.body_encoding)
            .field("query_or_body", &self.query_or_body)
            .finish()
    }
}

/// Builds the request for an operation.
///
/// POST requests carry the encoded parameters as a form body and get a
/// `Content-Type` header. GET requests carry them as the query string. The
/// provider's headers come first in both cases.
#[must_use]
pub fn build(
    meta: &OperationMeta,
    resolved: &ResolvedParameters,
    auth: &dyn AuthProvider,
) -> RequestDescriptor {
    let path = meta.path();
    let url = format!("{}{path}", auth.base_url().trim_end_matches('/'));
    let mut headers = auth.basic_headers();
    let body_encoding = match meta.method {
        HttpMethod::Post => {
            headers.push(("Content-Type".to_owned(), FORM_CONTENT_TYPE.to_owned()));
            BodyEncoding::FormUrlEncoded
        }
        HttpMethod::Get => BodyEncoding::None,
    };

    RequestDescriptor {
        method: meta.method,
        url,
        path,
        headers,
        body_encoding,
        query_or_body: encode(resolved),
    }
}
