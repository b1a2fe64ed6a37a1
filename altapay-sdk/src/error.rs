//! Error types for the gateway client.
//!
//! Every fallible call in this crate returns [`Result`], whose error type is
//! [`GatewayError`]. The variants follow the stage of the call pipeline in which
//! the failure happened.
//!
//! # Error Categories
//!
//! - **Validation errors** ([`GatewayError::MissingRequiredOption`],
//!   [`GatewayError::UnknownOption`], [`GatewayError::InvalidOptionValue`],
//!   [`GatewayError::InvalidOptionType`]): the caller supplied bad parameters
//! - **Transport errors** ([`GatewayError::Network`]): no usable response arrived
//! - **Response errors** ([`GatewayError::MalformedXml`],
//!   [`GatewayError::ResponseHeader`], [`GatewayError::ResponseMessage`],
//!   [`GatewayError::Deserialization`]): the gateway answered with something
//!   that violates the API contract, or flagged a failure inside a 200 response
//! - **Business errors** ([`GatewayError::Client`]): the gateway rejected the
//!   request with a structured error code
//!
//! # Examples
//!
//! ```
//! use altapay_sdk::error::{ErrorKind, GatewayError};
//!
//! let err = GatewayError::MissingRequiredOption("terminal".to_owned());
//! assert_eq!(err.kind(), ErrorKind::MissingRequiredOption);
//! assert!(!err.is_retryable());
//! ```

use std::fmt;

use thiserror::Error;

use crate::{options::ValueType, request::RequestDescriptor, transport::RawResponse};

/// Result type alias for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Raw request and response captured when a call failed after the request was built.
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    /// The request as it was handed to the transport.
    pub request: RequestDescriptor,
    /// The response, when the transport produced one.
    pub response: Option<RawResponse>,
}

/// Pipeline stage an error originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStage {
    /// Schema construction or client configuration.
    Setup,
    /// Option resolution.
    Validation,
    /// Sending the request.
    Transport,
    /// Parsing and checking the response document.
    Response,
    /// The gateway rejected the request.
    Business,
}

/// Payload-free discriminant of [`GatewayError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// See [`GatewayError::MissingRequiredOption`].
    MissingRequiredOption,
    /// See [`GatewayError::UnknownOption`].
    UnknownOption,
    /// See [`GatewayError::InvalidOptionValue`].
    InvalidOptionValue,
    /// See [`GatewayError::InvalidOptionType`].
    InvalidOptionType,
    /// See [`GatewayError::InvalidSchema`].
    InvalidSchema,
    /// See [`GatewayError::Network`].
    Network,
    /// See [`GatewayError::MalformedXml`].
    MalformedXml,
    /// See [`GatewayError::ResponseHeader`].
    ResponseHeader,
    /// See [`GatewayError::ResponseMessage`].
    ResponseMessage,
    /// See [`GatewayError::Deserialization`].
    Deserialization,
    /// See [`GatewayError::Client`].
    Client,
    /// See [`GatewayError::Config`].
    Config,
    /// See [`GatewayError::TransportConfig`].
    TransportConfig,
}

/// Errors that can occur while calling the gateway.
///
/// # Error Recovery
///
/// - **Validation errors**: fix the parameters; retrying unchanged input fails again
/// - **Network errors** ([`Network`](Self::Network)): safe to retry with backoff
/// - **Response errors**: report them together with [`exchange`](Self::exchange)
/// - **Business errors** ([`Client`](Self::Client)): inspect the gateway code and message
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A required option was neither supplied nor defaulted.
    ///
    /// # Recovery
    ///
    /// Call the operation's setter for the named option.
    #[error("missing required option '{0}'")]
    MissingRequiredOption(String),

    /// An option was supplied that the operation does not declare.
    #[error("unknown option '{key}', defined options are: {}", .defined.join(", "))]
    UnknownOption {
        /// Offending key.
        key: String,
        /// Every key the operation accepts, in declaration order.
        defined: Vec<String>,
    },

    /// An option value is not a member of its allowed-value set.
    ///
    /// # Examples
    ///
    /// ```
    /// use altapay_sdk::error::GatewayError;
    ///
    /// let err = GatewayError::InvalidOptionValue {
    ///     key: "fraud_service".to_owned(),
    ///     value: "unknown".to_owned(),
    ///     allowed: vec!["none".to_owned(), "maxmind".to_owned()],
    /// };
    /// assert!(err.to_string().contains("fraud_service"));
    /// ```
    #[error("option '{key}' has value \"{value}\", allowed values are: {}", .allowed.join(", "))]
    InvalidOptionValue {
        /// Offending key.
        key: String,
        /// Supplied value as it would go on the wire.
        value: String,
        /// Allowed values as they would go on the wire.
        allowed: Vec<String>,
    },

    /// An option value has a runtime type the option does not accept.
    #[error("option '{key}' is of type {actual}, expected {}", TypeList(.expected))]
    InvalidOptionType {
        /// Offending key.
        key: String,
        /// Accepted types.
        expected: Vec<ValueType>,
        /// Type of the supplied value.
        actual: ValueType,
    },

    /// Schema fragments contradict each other or a default breaks its own constraint.
    ///
    /// This is a programming error in an operation definition.
    #[error("invalid option schema: {0}")]
    InvalidSchema(String),

    /// The request did not produce a usable response.
    ///
    /// Covers DNS, connect and timeout failures as well as error statuses that
    /// came back without a body.
    ///
    /// # Recovery
    ///
    /// Retry with exponential backoff. The gateway may or may not have
    /// processed the request.
    #[error("network error: {message}")]
    Network {
        /// Description of the failure.
        message: String,
        /// Underlying transport error.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        /// Request that was being sent.
        exchange: Option<Box<Exchange>>,
    },

    /// The response body is not well-formed XML.
    #[error("malformed XML response: {message}")]
    MalformedXml {
        /// Parser diagnostic.
        message: String,
        /// Request and response of the failed call.
        exchange: Option<Box<Exchange>>,
    },

    /// The `<Header>` section is missing, unreadable, or reports an error code.
    #[error("response header error{}: {message}", CodeSuffix(.code.as_ref()))]
    ResponseHeader {
        /// Gateway error code, when the header could be read.
        code: Option<i64>,
        /// Gateway error message or parser diagnostic.
        message: String,
        /// Request and response of the failed call.
        exchange: Option<Box<Exchange>>,
    },

    /// The `<Body>` section is missing, unreadable, or carries an embedded failure.
    #[error("response message error: {message}")]
    ResponseMessage {
        /// Merchant-facing message or parser diagnostic.
        message: String,
        /// Message intended for the card holder, when the gateway sent one.
        cardholder_message: Option<String>,
        /// Request and response of the failed call.
        exchange: Option<Box<Exchange>>,
    },

    /// A response field could not be converted to its declared type.
    #[error("cannot deserialize '{field}': {message}")]
    Deserialization {
        /// Dotted path of the field, e.g. `Transaction.CreatedDate`.
        field: String,
        /// Conversion diagnostic.
        message: String,
        /// Request and response of the failed call.
        exchange: Option<Box<Exchange>>,
    },

    /// The gateway rejected the request with a structured error.
    ///
    /// # Recovery
    ///
    /// Inspect `code` and `message`; they usually name the parameter or the
    /// business rule (declined card, unknown terminal) at fault.
    #[error("gateway rejected the request (HTTP {status}, code {code}): {message}")]
    Client {
        /// HTTP status of the response.
        status: u16,
        /// Gateway error code from the response header.
        code: i64,
        /// Gateway error message.
        message: String,
        /// Request and response of the failed call.
        exchange: Option<Box<Exchange>>,
    },

    /// Client configuration is invalid or incomplete.
    #[error("configuration error: {0}")]
    Config(String),

    /// The transport refused to build a client or to send a request.
    #[error("transport configuration error: {0}")]
    TransportConfig(String),
}

impl GatewayError {
    /// Returns the payload-free kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingRequiredOption(_) => ErrorKind::MissingRequiredOption,
            Self::UnknownOption { .. } => ErrorKind::UnknownOption,
            Self::InvalidOptionValue { .. } => ErrorKind::InvalidOptionValue,
            Self::InvalidOptionType { .. } => ErrorKind::InvalidOptionType,
            Self::InvalidSchema(_) => ErrorKind::InvalidSchema,
            Self::Network { .. } => ErrorKind::Network,
            Self::MalformedXml { .. } => ErrorKind::MalformedXml,
            Self::ResponseHeader { .. } => ErrorKind::ResponseHeader,
            Self::ResponseMessage { .. } => ErrorKind::ResponseMessage,
            Self::Deserialization { .. } => ErrorKind::Deserialization,
            Self::Client { .. } => ErrorKind::Client,
            Self::Config(_) => ErrorKind::Config,
            Self::TransportConfig(_) => ErrorKind::TransportConfig,
        }
    }

    /// Returns the pipeline stage this error belongs to.
    #[must_use]
    pub const fn stage(&self) -> CallStage {
        match self.kind() {
            ErrorKind::MissingRequiredOption
            | ErrorKind::UnknownOption
            | ErrorKind::InvalidOptionValue
            | ErrorKind::InvalidOptionType => CallStage::Validation,
            ErrorKind::InvalidSchema | ErrorKind::Config | ErrorKind::TransportConfig => {
                CallStage::Setup
            }
            ErrorKind::Network => CallStage::Transport,
            ErrorKind::MalformedXml
            | ErrorKind::ResponseHeader
            | ErrorKind::ResponseMessage
            | ErrorKind::Deserialization => CallStage::Response,
            ErrorKind::Client => CallStage::Business,
        }
    }

    /// Returns true when repeating the same call may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Returns the raw request/response attached to this error, if any.
    #[must_use]
    pub fn exchange(&self) -> Option<&Exchange> {
        match self {
            Self::Network { exchange, .. }
            | Self::MalformedXml { exchange, .. }
            | Self::ResponseHeader { exchange, .. }
            | Self::ResponseMessage { exchange, .. }
            | Self::Deserialization { exchange, .. }
            | Self::Client { exchange, .. } => exchange.as_deref(),
            _ => None,
        }
    }

    /// Attaches the raw request/response to errors that carry one.
    ///
    /// An exchange that is already present is kept.
    pub(crate) fn with_exchange(mut self, captured: Exchange) -> Self {
        match &mut self {
            Self::Network { exchange, .. }
            | Self::MalformedXml { exchange, .. }
            | Self::ResponseHeader { exchange, .. }
            | Self::ResponseMessage { exchange, .. }
            | Self::Deserialization { exchange, .. }
            | Self::Client { exchange, .. } => {
                if exchange.is_none() {
                    *exchange = Some(Box::new(captured));
                }
            }
            _ => {}
        }
        self
    }

    pub(crate) fn deserialization(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Deserialization { field: field.into(), message: message.into(), exchange: None }
    }
}

struct TypeList<'a>(&'a [ValueType]);

impl fmt::Display for TypeList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, value_type) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(" or ")?;
            }
            write!(f, "{value_type}")?;
        }
        Ok(())
    }
}

struct CodeSuffix<'a>(Option<&'a i64>);

impl fmt::Display for CodeSuffix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(code) => write!(f, " {code}"),
            None => Ok(()),
        }
    }
}
