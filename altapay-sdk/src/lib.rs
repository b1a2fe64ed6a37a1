//! AltaPay SDK: typed client for the AltaPay merchant API
//!
//! Every gateway operation runs the same pipeline: parameters set through
//! typed setters are validated against a declarative option schema, encoded
//! into a form body or query string, sent over a [`Transport`], and the XML
//! response is mapped onto typed structs or classified into a [`GatewayError`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐   setters    ┌───────────────────┐
//! │  Operation       │─────────────▶│  RawParameters    │
//! │  (api module)    │              └─────────┬─────────┘
//! └────────┬─────────┘                        │ OptionSchema::resolve
//!          │ call()                 ┌─────────▼─────────┐
//!          │                        │ ResolvedParameters│
//!          │                        └─────────┬─────────┘
//!          │                                  │ request::build
//!          │                        ┌─────────▼─────────┐
//!          │                        │ RequestDescriptor │
//!          │                        └─────────┬─────────┘
//!          │                                  │ Transport::send
//!          │                        ┌─────────▼─────────┐
//!          │                        │  RawResponse      │
//!          │                        └─────────┬─────────┘
//!          │          deserialize_success /   │ classify_failure
//!          ▼                                  ▼
//!   typed response                       GatewayError
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use altapay_sdk::{
//!     api::InvoiceReservation,
//!     auth::Authentication,
//!     transport::HttpTransport,
//!     types::{CustomerInfo, PaymentType},
//! };
//! use rust_decimal::Decimal;
//!
//! # async fn example() -> altapay_sdk::Result<()> {
//! let auth = Authentication::new("api_user", "api_password");
//! let transport = Arc::new(HttpTransport::new()?);
//!
//! let customer = CustomerInfo { email: Some("buyer@example.com".to_owned()), ..Default::default() };
//!
//! let mut reservation = InvoiceReservation::new(auth, transport);
//! reservation
//!     .set_terminal("AltaPay Test Invoice Terminal DK")
//!     .set_shop_order_id("order-1001")
//!     .set_amount(Decimal::new(3533, 2))
//!     .set_currency("DKK")
//!     .set_type(PaymentType::Payment)
//!     .set_customer_info(&customer);
//!
//! let response = reservation.call().await?;
//! for transaction in &response.transactions {
//!     println!("{} {:?}", transaction.transaction_id, transaction.transaction_status);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`options`]: parameter values, schemas, fragments and resolution
//! - [`request`]: request descriptors and form encoding
//! - [`transport`]: the [`Transport`] trait, reqwest transport and test mock
//! - [`response`]: XML tree, type descriptors, typed responses, classification
//! - [`api`]: the operations and their call state machine
//! - [`types`]: request-side domain values (customer, order lines, enums)
//! - [`auth`], [`config`]: credentials and TOML configuration
//! - [`error`]: the error taxonomy
//!
//! # Logging
//!
//! The crate emits [`tracing`] spans and events. Each call runs in an
//! `execute` span carrying the operation name, method and path; state
//! transitions log at `debug`, failures at `warn`, successes at `info`.
//! Credentials are never logged.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![allow(
    clippy::multiple_crate_versions,
    reason = "transitive dependencies from reqwest"
)]

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod options;
pub mod request;
pub mod response;
pub mod transport;
pub mod types;

pub use api::{CallState, InvoiceReservation, InvoiceText, Operation, TestAuthentication};
pub use auth::Authentication;
pub use config::GatewayConfig;
pub use error::{GatewayError, Result};
pub use transport::Transport;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify public API is accessible
        let _ = std::marker::PhantomData::<GatewayError>;
        let _ = std::marker::PhantomData::<InvoiceReservation<transport::MockTransport>>;
    }
}
