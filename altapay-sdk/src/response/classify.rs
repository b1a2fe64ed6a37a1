//! Turns raw responses and transport failures into typed results or errors.

use tracing::warn;

use super::{
    deserialize::FromXml,
    models::{HasOutcome, ResponseHeader},
    xml::{XmlElement, parse},
};
use crate::{
    error::{GatewayError, Result},
    transport::{RawResponse, TransportFailure},
};

fn header_error(code: Option<i64>, message: impl Into<String>) -> GatewayError {
    GatewayError::ResponseHeader { code, message: message.into(), exchange: None }
}

fn message_error(message: impl Into<String>, cardholder_message: Option<String>) -> GatewayError {
    GatewayError::ResponseMessage { message: message.into(), cardholder_message, exchange: None }
}

fn read_header(root: &XmlElement) -> Result<ResponseHeader> {
    let header =
        root.child("Header").ok_or_else(|| header_error(None, "response has no <Header> section"))?;
    ResponseHeader::from_element(header)
        .map_err(|e| header_error(None, format!("unreadable <Header>: {e}")))
}

fn read_body(root: &XmlElement) -> Result<&XmlElement> {
    root.child("Body").ok_or_else(|| message_error("response has no <Body> section", None))
}

/// Deserializes a 2xx response into its header and typed body.
///
/// Checks run in order: well-formed XML, a readable `<Header>` with
/// `ErrorCode` 0, a `<Body>` section, the body's fields, and finally the
/// body's `<Result>` for an embedded failure.
///
/// # Errors
///
/// - [`GatewayError::MalformedXml`] if the body is not well-formed
/// - [`GatewayError::ResponseHeader`] if the header is missing, unreadable or
///   carries a non-zero error code
/// - [`GatewayError::ResponseMessage`] if the body is missing or reports
///   `<Result>Error</Result>`
/// - [`GatewayError::Deserialization`] if a body field has the wrong format
pub fn deserialize_success<T>(response: &RawResponse) -> Result<(ResponseHeader, T)>
where
    T: FromXml + HasOutcome,
{
    let root = parse(&response.body)?;
    let header = read_header(&root)?;
    if !header.is_ok() {
        let message = header
            .error_message
            .clone()
            .unwrap_or_else(|| format!("gateway error code {}", header.error_code));
        return Err(header_error(Some(header.error_code), message));
    }

    let body = T::from_element(read_body(&root)?)?;
    if body.is_embedded_error() {
        let message = body.merchant_error_message().unwrap_or("gateway reported Result Error");
        return Err(message_error(message, body.cardholder_error_message().map(ToOwned::to_owned)));
    }
    Ok((header, body))
}

/// Maps a transport failure onto the error taxonomy.
///
/// Failures without a response stay network errors. An error status whose
/// body parses is a business rejection ([`GatewayError::Client`]); one whose
/// body does not parse is reported against the unreadable section.
pub fn classify_failure(failure: TransportFailure) -> GatewayError {
    match failure {
        TransportFailure::Network { message, source } => {
            GatewayError::Network { message, source, exchange: None }
        }
        TransportFailure::Policy(message) => GatewayError::TransportConfig(message),
        TransportFailure::Status { response } => classify_status(&response),
    }
}

fn classify_status(response: &RawResponse) -> GatewayError {
    let status = response.status;
    if response.body.iter().all(u8::is_ascii_whitespace) {
        return GatewayError::Network {
            message: format!("gateway returned HTTP {status} without a body"),
            source: None,
            exchange: None,
        };
    }

    let root = match parse(&response.body) {
        Ok(root) => root,
        Err(e) => {
            warn!(status, error = %e, "error response body is not XML");
            return header_error(None, format!("HTTP {status} with unreadable body: {e}"));
        }
    };
    let header = match read_header(&root) {
        Ok(header) => header,
        Err(e) => return e,
    };
    let body = match read_body(&root) {
        Ok(body) => body,
        Err(e) => return e,
    };

    let message = header
        .error_message
        .clone()
        .or_else(|| body.child_text("MerchantErrorMessage").filter(|m| !m.is_empty()).map(ToOwned::to_owned))
        .unwrap_or_else(|| format!("HTTP status {status}"));
    GatewayError::Client { status, code: header.error_code, message, exchange: None }
}
