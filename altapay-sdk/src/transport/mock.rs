//! In-memory transport for tests.

use std::{
    collections::VecDeque,
    sync::{Mutex, MutexGuard, PoisonError},
};

use super::{RawResponse, Transport, TransportFailure, sealed};
use crate::request::RequestDescriptor;

#[derive(Debug)]
enum Reply {
    Response(RawResponse),
    NetworkError(String),
}

/// Replays queued replies and records every request.
///
/// A 2xx reply is returned as-is, any other status as
/// [`TransportFailure::Status`], mirroring [`HttpTransport`](super::HttpTransport).
/// Sending with an empty queue fails with [`TransportFailure::Network`].
///
/// # Examples
///
/// ```
/// use altapay_sdk::transport::MockTransport;
///
/// let transport = MockTransport::new();
/// transport.push_xml(200, "<APIResponse/>");
/// assert!(transport.requests().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<RequestDescriptor>>,
}

impl sealed::private::Sealed for MockTransport {}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockTransport {
    /// Creates a transport with no queued replies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response.
    pub fn push_response(&self, response: RawResponse) -> &Self {
        lock(&self.replies).push_back(Reply::Response(response));
        self
    }

    /// Queues an XML response with the given status.
    pub fn push_xml(&self, status: u16, body: &str) -> &Self {
        let mut response = RawResponse::new(status, body.as_bytes());
        response.headers.push(("content-type".to_owned(), "text/xml; charset=utf-8".to_owned()));
        self.push_response(response)
    }

    /// Queues a network failure.
    pub fn push_network_error(&self, message: impl Into<String>) -> &Self {
        lock(&self.replies).push_back(Reply::NetworkError(message.into()));
        self
    }

    /// Requests received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RequestDescriptor> {
        lock(&self.requests).clone()
    }

    /// The most recent request.
    #[must_use]
    pub fn last_request(&self) -> Option<RequestDescriptor> {
        lock(&self.requests).last().cloned()
    }

    fn next_reply(&self, request: &RequestDescriptor) -> Result<RawResponse, TransportFailure> {
        lock(&self.requests).push(request.clone());
        match lock(&self.replies).pop_front() {
            Some(Reply::Response(response)) if response.is_success() => Ok(response),
            Some(Reply::Response(response)) => Err(TransportFailure::Status { response }),
            Some(Reply::NetworkError(message)) => {
                Err(TransportFailure::Network { message, source: None })
            }
            None => Err(TransportFailure::Network {
                message: "no reply queued".to_owned(),
                source: None,
            }),
        }
    }
}

impl Transport for MockTransport {
    async fn send<'a>(
        &'a self,
        request: &'a RequestDescriptor,
    ) -> Result<RawResponse, TransportFailure> {
        self.next_reply(request)
    }

    fn protocol_name(&self) -> &'static str {
        "mock"
    }
}
