//! Schema fragments shared by several operations.
//!
//! Each fragment declares one option and the constraints that come with it.
//! Operations combine them:
//!
//! ```
//! use altapay_sdk::options::{AmountFragment, OptionSchema, TerminalFragment};
//!
//! let schema = OptionSchema::builder()
//!     .fragment(&TerminalFragment)
//!     .fragment(&AmountFragment)
//!     .build()?;
//! assert_eq!(schema.keys().collect::<Vec<_>>(), ["terminal", "amount"]);
//! # Ok::<(), altapay_sdk::GatewayError>(())
//! ```

use super::{OptionSchemaBuilder, SchemaFragment, ValueType};

/// Required `terminal`: the merchant terminal name.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalFragment;

impl SchemaFragment for TerminalFragment {
    fn contribute(&self, builder: OptionSchemaBuilder) -> OptionSchemaBuilder {
        builder.required(["terminal"]).allowed_types("terminal", &[ValueType::String])
    }
}

/// Required `shop_orderid`: the merchant's order reference.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShopOrderIdFragment;

impl SchemaFragment for ShopOrderIdFragment {
    fn contribute(&self, builder: OptionSchemaBuilder) -> OptionSchemaBuilder {
        builder.required(["shop_orderid"]).allowed_types("shop_orderid", &[ValueType::String])
    }
}

/// Required `amount`, integer or decimal.
#[derive(Debug, Clone, Copy, Default)]
pub struct AmountFragment;

impl SchemaFragment for AmountFragment {
    fn contribute(&self, builder: OptionSchemaBuilder) -> OptionSchemaBuilder {
        builder
            .required(["amount"])
            .allowed_types("amount", &[ValueType::Integer, ValueType::Decimal])
    }
}

/// Required `currency`, ISO 4217 alpha (`DKK`) or numeric (`208`).
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrencyFragment;

impl SchemaFragment for CurrencyFragment {
    fn contribute(&self, builder: OptionSchemaBuilder) -> OptionSchemaBuilder {
        builder
            .required(["currency"])
            .allowed_types("currency", &[ValueType::String, ValueType::Integer])
    }
}

/// Optional `transaction_info`: free-form merchant key/value pairs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionInfoFragment;

impl SchemaFragment for TransactionInfoFragment {
    fn contribute(&self, builder: OptionSchemaBuilder) -> OptionSchemaBuilder {
        builder.optional(["transaction_info"]).allowed_types("transaction_info", &[ValueType::Map])
    }
}

/// Optional `customer_info`, see [`CustomerInfo`](crate::types::CustomerInfo).
#[derive(Debug, Clone, Copy, Default)]
pub struct CustomerInfoFragment;

impl SchemaFragment for CustomerInfoFragment {
    fn contribute(&self, builder: OptionSchemaBuilder) -> OptionSchemaBuilder {
        builder.optional(["customer_info"]).allowed_types("customer_info", &[ValueType::Map])
    }
}

/// Optional `orderLines`, see [`OrderLine`](crate::types::OrderLine).
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderLinesFragment;

impl SchemaFragment for OrderLinesFragment {
    fn contribute(&self, builder: OptionSchemaBuilder) -> OptionSchemaBuilder {
        builder.optional(["orderLines"]).allowed_types("orderLines", &[ValueType::List])
    }
}

/// Required `transaction_id` of an earlier payment.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionFragment;

impl SchemaFragment for TransactionFragment {
    fn contribute(&self, builder: OptionSchemaBuilder) -> OptionSchemaBuilder {
        builder
            .required(["transaction_id"])
            .allowed_types("transaction_id", &[ValueType::String, ValueType::Integer])
    }
}
