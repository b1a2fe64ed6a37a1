//! Gateway operations.
//!
//! Each operation collects parameters through typed setters and runs one
//! pipeline per `call()`:
//!
//! ```text
//! Built → OptionsResolving → RequestBuilding → Sending → ResponseHandling → Succeeded | Failed
//! ```
//!
//! Any failure jumps straight to [`CallState::Failed`]; nothing is retried.
//! The request and response of the last call stay available through
//! [`Operation::raw_request`] and [`Operation::raw_response`].

use std::{
    fmt,
    sync::{Arc, LazyLock},
};

use tracing::{debug, info, instrument, warn};

use crate::{
    auth::AuthProvider,
    error::{Exchange, GatewayError, Result},
    options::{OptionSchema, OptionValue, RawParameters},
    request::{self, OperationMeta, RequestDescriptor},
    response::{FromXml, HasOutcome, ResponseHeader, classify_failure, deserialize_success},
    transport::{RawResponse, Transport, TransportFailure},
};

mod invoice_reservation;
mod invoice_text;
mod test_authentication;

pub use invoice_reservation::InvoiceReservation;
pub use invoice_text::InvoiceText;
pub use test_authentication::TestAuthentication;

/// Stage reached by the most recent call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    /// No call has started.
    Built,
    /// Checking parameters against the schema.
    OptionsResolving,
    /// Encoding the request.
    RequestBuilding,
    /// Waiting for the transport.
    Sending,
    /// Parsing and classifying the response.
    ResponseHandling,
    /// The call returned a typed response.
    Succeeded,
    /// The call returned an error.
    Failed,
}

impl CallState {
    /// Returns true for `Succeeded` and `Failed`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// Lazily built schema shared by every instance of one operation.
pub(crate) type SchemaCell = LazyLock<std::result::Result<OptionSchema, String>>;

/// Reads a [`SchemaCell`].
pub(crate) fn cached_schema(cell: &'static SchemaCell) -> Result<&'static OptionSchema> {
    cell.as_ref().map_err(|message| GatewayError::InvalidSchema(message.clone()))
}

/// Converts a schema build result into what a [`SchemaCell`] stores.
pub(crate) fn store_schema(built: Result<OptionSchema>) -> std::result::Result<OptionSchema, String> {
    built.map_err(|e| match e {
        GatewayError::InvalidSchema(message) => message,
        other => other.to_string(),
    })
}

/// One remote API call and its parameter/response contract.
pub trait Operation {
    /// Transport the operation sends through.
    type Transport: Transport;

    /// Typed body of a successful response.
    type Response: FromXml + HasOutcome;

    /// Endpoint and method.
    const META: OperationMeta;

    /// Accepted parameters.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidSchema`] if the operation's fragments
    /// conflict.
    fn schema() -> Result<&'static OptionSchema>;

    /// Shared call state.
    fn core(&self) -> &ApiCore<Self::Transport>;

    /// Shared call state, mutably.
    fn core_mut(&mut self) -> &mut ApiCore<Self::Transport>;

    /// Sets a raw parameter, bypassing the typed setters.
    ///
    /// The key is still checked against the schema at call time.
    fn set(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> &mut Self
    where
        Self: Sized,
    {
        self.core_mut().parameters.set(key, value);
        self
    }

    /// Parameters set so far.
    fn parameters(&self) -> &RawParameters {
        &self.core().parameters
    }

    /// Stage reached by the most recent call.
    fn state(&self) -> CallState {
        self.core().state
    }

    /// Request sent by the most recent call.
    fn raw_request(&self) -> Option<&RequestDescriptor> {
        self.core().last_request.as_ref()
    }

    /// Response received by the most recent call, including error statuses.
    fn raw_response(&self) -> Option<&RawResponse> {
        self.core().last_response.as_ref()
    }

    /// Header of the most recent successful response.
    fn response_header(&self) -> Option<&ResponseHeader> {
        self.core().last_header.as_ref()
    }
}

/// Credentials, transport, parameters and diagnostics of one operation instance.
pub struct ApiCore<T> {
    auth: Arc<dyn AuthProvider>,
    transport: Arc<T>,
    parameters: RawParameters,
    state: CallState,
    last_request: Option<RequestDescriptor>,
    last_response: Option<RawResponse>,
    last_header: Option<ResponseHeader>,
}

impl<T: fmt::Debug> fmt::Debug for ApiCore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCore")
            .field("base_url", &self.auth.base_url())
            .field("transport", &self.transport)
            .field("parameters", &self.parameters)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> ApiCore<T> {
    pub(crate) fn new(auth: impl AuthProvider + 'static, transport: Arc<T>) -> Self {
        Self {
            auth: Arc::new(auth),
            transport,
            parameters: RawParameters::new(),
            state: CallState::Built,
            last_request: None,
            last_response: None,
            last_header: None,
        }
    }

    pub(crate) fn parameters_mut(&mut self) -> &mut RawParameters {
        &mut self.parameters
    }

    fn transition(&mut self, next: CallState) {
        debug!(from = ?self.state, to = ?next, "state transition");
        self.state = next;
    }

    /// Runs the pipeline for operation `O`.
    #[instrument(
        skip(self),
        fields(operation = O::META.name, method = %O::META.method, path = %O::META.path())
    )]
    pub(crate) async fn execute<O>(&mut self) -> Result<O::Response>
    where
        O: Operation<Transport = T>,
    {
        self.state = CallState::Built;
        self.last_request = None;
        self.last_response = None;
        self.last_header = None;

        let result = self.run::<O>().await;
        match &result {
            Ok(_) => {
                self.transition(CallState::Succeeded);
                info!("call succeeded");
            }
            Err(e) => {
                self.transition(CallState::Failed);
                warn!(kind = ?e.kind(), stage = ?e.stage(), error = %e, "call failed");
            }
        }
        result
    }

    async fn run<O>(&mut self) -> Result<O::Response>
    where
        O: Operation<Transport = T>,
    {
        self.transition(CallState::OptionsResolving);
        let resolved = O::schema()?.resolve(&self.parameters)?;

        self.transition(CallState::RequestBuilding);
        let request = request::build(&O::META, &resolved, self.auth.as_ref());
        self.last_request = Some(request.clone());

        self.transition(CallState::Sending);
        let sent = self.transport.send(&request).await;

        self.transition(CallState::ResponseHandling);
        let outcome = match sent {
            Ok(response) => {
                let outcome = deserialize_success::<O::Response>(&response);
                self.last_response = Some(response);
                outcome
            }
            Err(failure) => {
                if let TransportFailure::Status { response } = &failure {
                    self.last_response = Some(response.clone());
                }
                Err(classify_failure(failure))
            }
        };

        match outcome {
            Ok((header, body)) => {
                self.last_header = Some(header);
                Ok(body)
            }
            Err(e) => Err(e.with_exchange(Exchange { request, response: self.last_response.clone() })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::Authentication,
        error::ErrorKind,
        transport::MockTransport,
    };

    const OK: &str = "<APIResponse><Header><ErrorCode>0</ErrorCode></Header>\
                      <Body><Result>OK</Result></Body></APIResponse>";

    fn operation(transport: &Arc<MockTransport>) -> TestAuthentication<MockTransport> {
        TestAuthentication::new(Authentication::new("user", "pass"), Arc::clone(transport))
    }

    #[test]
    fn test_terminal_states() {
        assert!(CallState::Succeeded.is_terminal());
        assert!(CallState::Failed.is_terminal());
        assert!(!CallState::Sending.is_terminal());
    }

    #[test]
    fn test_new_operation_is_built() {
        let transport = Arc::new(MockTransport::new());
        let op = operation(&transport);
        assert_eq!(op.state(), CallState::Built);
        assert!(op.raw_request().is_none());
        assert!(op.raw_response().is_none());
    }

    #[tokio::test]
    async fn test_success_records_exchange() {
        let transport = Arc::new(MockTransport::new());
        transport.push_xml(200, OK);
        let mut op = operation(&transport);

        let response = op.execute().await.unwrap();
        assert_eq!(response.result, "OK");
        assert_eq!(op.state(), CallState::Succeeded);
        assert_eq!(op.raw_request().unwrap().path, "/merchant/API/testAuthentication");
        assert_eq!(op.raw_response().unwrap().status, 200);
        assert!(op.response_header().unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_validation_failure_stops_before_sending() {
        let transport = Arc::new(MockTransport::new());
        let mut op = operation(&transport);
        op.set("unexpected", "x");

        let error = op.execute().await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::UnknownOption);
        assert_eq!(op.state(), CallState::Failed);
        assert!(op.raw_request().is_none());
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_failure_attaches_exchange_and_next_call_starts_fresh() {
        let transport = Arc::new(MockTransport::new());
        transport.push_xml(200, "<APIResponse>").push_xml(200, OK);
        let mut op = operation(&transport);

        let error = op.execute().await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MalformedXml);
        let exchange = error.exchange().unwrap();
        assert_eq!(exchange.request.path, "/merchant/API/testAuthentication");
        assert_eq!(exchange.response.as_ref().unwrap().body, b"<APIResponse>");

        op.execute().await.unwrap();
        assert_eq!(op.state(), CallState::Succeeded);
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_error_status_is_kept_as_raw_response() {
        let transport = Arc::new(MockTransport::new());
        transport.push_xml(
            403,
            "<APIResponse><Header><ErrorCode>403</ErrorCode><ErrorMessage>Forbidden</ErrorMessage>\
             </Header><Body/></APIResponse>",
        );
        let mut op = operation(&transport);

        let error = op.execute().await.unwrap_err();
        assert!(matches!(error, GatewayError::Client { status: 403, code: 403, .. }));
        assert_eq!(op.raw_response().unwrap().status, 403);
        assert!(op.response_header().is_none());
    }
}
