use std::sync::{Arc, LazyLock};

use rust_decimal::Decimal;

use super::{ApiCore, Operation, SchemaCell, cached_schema, store_schema};
use crate::{
    auth::AuthProvider,
    error::Result,
    options::{OptionSchema, OptionValue, TransactionFragment, ValueType},
    request::{HttpMethod, OperationMeta},
    response::{InvoiceTextResponse, Transaction},
    transport::Transport,
};

static SCHEMA: SchemaCell = LazyLock::new(|| {
    store_schema(
        OptionSchema::builder()
            .fragment(&TransactionFragment)
            .optional(["amount"])
            .allowed_types("amount", &[ValueType::Integer, ValueType::Decimal])
            .build(),
    )
});

/// Fetches the texts to print on an invoice (`getInvoiceText`).
#[derive(Debug)]
pub struct InvoiceText<T> {
    core: ApiCore<T>,
}

impl<T: Transport> InvoiceText<T> {
    /// Creates the operation with no parameters set.
    pub fn new(auth: impl AuthProvider + 'static, transport: Arc<T>) -> Self {
        Self { core: ApiCore::new(auth, transport) }
    }

    /// Invoice for this transaction.
    pub fn set_transaction(&mut self, transaction: &Transaction) -> &mut Self {
        self.set_transaction_id(transaction.transaction_id.as_str())
    }

    /// Invoice for the transaction with this id.
    pub fn set_transaction_id(&mut self, transaction_id: impl Into<OptionValue>) -> &mut Self {
        self.core.parameters_mut().set("transaction_id", transaction_id);
        self
    }

    /// Amount to invoice, when less than the reserved amount.
    pub fn set_amount(&mut self, amount: Decimal) -> &mut Self {
        self.core.parameters_mut().set("amount", amount);
        self
    }

    /// Fetches the invoice text.
    ///
    /// # Errors
    ///
    /// Returns a validation error when no transaction is set, or the
    /// classified transport, response or business error.
    pub async fn call(&mut self) -> Result<InvoiceTextResponse> {
        self.core.execute::<Self>().await
    }
}

impl<T: Transport> Operation for InvoiceText<T> {
    type Transport = T;
    type Response = InvoiceTextResponse;

    const META: OperationMeta =
        OperationMeta { name: "InvoiceText", method: HttpMethod::Get, endpoint: "getInvoiceText" };

    fn schema() -> Result<&'static OptionSchema> {
        cached_schema(&SCHEMA)
    }

    fn core(&self) -> &ApiCore<T> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ApiCore<T> {
        &mut self.core
    }
}
