//! Request-side domain types.
//!
//! Enumerations whose variants back the allowed-value sets of operation
//! schemas, and structured values that flatten into nested parameters.

use std::fmt;

use crate::options::OptionValue;

mod customer;
mod order_line;

pub use customer::{CustomerAddress, CustomerInfo};
pub use order_line::OrderLine;

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every variant, in gateway documentation order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Returns the value sent on the wire.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }

            /// Wire values of every variant.
            pub fn allowed() -> impl Iterator<Item = &'static str> {
                Self::ALL.iter().map(|variant| variant.as_str())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<$name> for OptionValue {
            fn from(value: $name) -> Self {
                Self::String(value.as_str().to_owned())
            }
        }
    };
}

wire_enum! {
    /// Kind of payment to create.
    pub enum PaymentType {
        /// Reserve now, capture later.
        Payment => "payment",
        /// Reserve and capture in one step.
        PaymentAndCapture => "paymentAndCapture",
        /// Zero-amount card verification.
        VerifyCard => "verifyCard",
        /// Set up a recurring agreement.
        Subscription => "subscription",
        /// Set up a recurring agreement and charge the first amount.
        SubscriptionAndCharge => "subscriptionAndCharge",
        /// Set up a recurring agreement and reserve the first amount.
        SubscriptionAndReserve => "subscriptionAndReserve",
    }
}

wire_enum! {
    /// Channel the payment originates from.
    pub enum PaymentSource {
        /// Web shop.
        ECommerce => "eCommerce",
        /// Mobile shop.
        Mobi => "mobi",
        /// Mail or telephone order.
        Moto => "moto",
        /// Mail order.
        MailOrder => "mail_order",
        /// Telephone order.
        TelephoneOrder => "telephone_order",
    }
}

wire_enum! {
    /// Fraud screening service to apply to one payment.
    pub enum FraudService {
        /// No screening.
        None => "none",
        /// `MaxMind` minFraud.
        Maxmind => "maxmind",
        /// ReD Shield.
        Red => "red",
        /// Test service, accepts everything.
        Test => "test",
    }
}

wire_enum! {
    /// Category of an order line.
    pub enum GoodsType {
        /// Shipping cost.
        Shipment => "shipment",
        /// Handling fee.
        Handling => "handling",
        /// Goods.
        Item => "item",
        /// Refunded amount.
        Refund => "refund",
    }
}
