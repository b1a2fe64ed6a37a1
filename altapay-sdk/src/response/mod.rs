//! XML response handling.
//!
//! Every gateway response is an `<APIResponse>` envelope with a `<Header>`
//! (timestamp, path, error code) and a `<Body>` (the payload). Parsing runs in
//! three steps:
//!
//! 1. [`parse`] builds an [`XmlElement`] tree, or fails with
//!    [`MalformedXml`](crate::GatewayError::MalformedXml).
//! 2. [`map_object`] walks an element guided by a static [`TypeDescriptor`],
//!    producing an [`XmlObject`] of typed scalars, nested objects and lists.
//! 3. A [`FromXml`] type converts the object into its public struct.
//!
//! [`deserialize_success`] and [`classify_failure`] wrap these steps with the
//! header and body checks that decide between a typed result and an error.

mod classify;
mod descriptor;
mod deserialize;
mod models;
mod xml;

pub use classify::{classify_failure, deserialize_success};
pub use descriptor::{FieldDescriptor, FieldKind, FieldSource, TypeDescriptor};
pub use deserialize::{FieldValue, FromXml, XmlObject, map_object};
pub use models::{
    Address, CustomerDetails, HasOutcome, InvoiceReservationResponse, InvoiceTextResponse,
    PaymentInfo, ResponseHeader, TestAuthenticationResponse, TextInfo, Transaction,
};
pub use xml::{XmlElement, parse};
