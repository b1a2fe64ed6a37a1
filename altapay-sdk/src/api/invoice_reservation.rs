use std::sync::{Arc, LazyLock};

use rust_decimal::Decimal;

use super::{ApiCore, Operation, SchemaCell, cached_schema, store_schema};
use crate::{
    auth::AuthProvider,
    error::Result,
    options::{
        AmountFragment, CurrencyFragment, CustomerInfoFragment, OptionSchema, OptionValue,
        OrderLinesFragment, ShopOrderIdFragment, TerminalFragment, TransactionInfoFragment,
        ValueType,
    },
    request::{HttpMethod, OperationMeta},
    response::InvoiceReservationResponse,
    transport::Transport,
    types::{CustomerInfo, FraudService, OrderLine, PaymentSource, PaymentType},
};

static SCHEMA: SchemaCell = LazyLock::new(|| {
    store_schema(
        OptionSchema::builder()
            .fragment(&TerminalFragment)
            .fragment(&ShopOrderIdFragment)
            .fragment(&AmountFragment)
            .fragment(&CurrencyFragment)
            .fragment(&TransactionInfoFragment)
            .fragment(&CustomerInfoFragment)
            .fragment(&OrderLinesFragment)
            .required(["type", "payment_source"])
            .default("type", PaymentType::Payment)
            .allowed_values("type", PaymentType::allowed())
            .default("payment_source", PaymentSource::ECommerce)
            .allowed_values("payment_source", PaymentSource::allowed())
            .optional(["accountNumber", "bankCode", "fraud_service"])
            .allowed_types("accountNumber", &[ValueType::String])
            .allowed_types("bankCode", &[ValueType::String])
            .allowed_values("fraud_service", FraudService::allowed())
            .build(),
    )
});

/// Creates an invoice reservation (`createInvoiceReservation`).
///
/// `type` defaults to `payment` and `payment_source` to `eCommerce`.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use altapay_sdk::{
///     api::{InvoiceReservation, Operation},
///     auth::Authentication,
///     transport::MockTransport,
/// };
/// use rust_decimal::Decimal;
///
/// let mut reservation =
///     InvoiceReservation::new(Authentication::new("user", "pass"), Arc::new(MockTransport::new()));
/// reservation
///     .set_terminal("AltaPay Test Terminal")
///     .set_shop_order_id("order-1")
///     .set_amount(Decimal::new(3533, 2))
///     .set_currency("DKK");
/// assert_eq!(reservation.parameters().len(), 4);
/// ```
#[derive(Debug)]
pub struct InvoiceReservation<T> {
    core: ApiCore<T>,
}

impl<T: Transport> InvoiceReservation<T> {
    /// Creates the operation with no parameters set.
    pub fn new(auth: impl AuthProvider + 'static, transport: Arc<T>) -> Self {
        Self { core: ApiCore::new(auth, transport) }
    }

    fn put(&mut self, key: &str, value: impl Into<OptionValue>) -> &mut Self {
        self.core.parameters_mut().set(key, value);
        self
    }

    /// Terminal to reserve on.
    pub fn set_terminal(&mut self, terminal: impl Into<String>) -> &mut Self {
        self.put("terminal", terminal.into())
    }

    /// Order id of the shop.
    pub fn set_shop_order_id(&mut self, shop_order_id: impl Into<String>) -> &mut Self {
        self.put("shop_orderid", shop_order_id.into())
    }

    /// Amount to reserve.
    pub fn set_amount(&mut self, amount: Decimal) -> &mut Self {
        self.put("amount", amount)
    }

    /// Currency as ISO 4217 alpha code (`DKK`) or numeric code.
    pub fn set_currency(&mut self, currency: impl Into<OptionValue>) -> &mut Self {
        self.put("currency", currency)
    }

    /// Payment type.
    pub fn set_type(&mut self, payment_type: PaymentType) -> &mut Self {
        self.put("type", payment_type)
    }

    /// Channel the payment comes from.
    pub fn set_payment_source(&mut self, source: PaymentSource) -> &mut Self {
        self.put("payment_source", source)
    }

    /// Customer bank account number.
    pub fn set_account_number(&mut self, account_number: impl Into<String>) -> &mut Self {
        self.put("accountNumber", account_number.into())
    }

    /// Customer bank code.
    pub fn set_bank_code(&mut self, bank_code: impl Into<String>) -> &mut Self {
        self.put("bankCode", bank_code.into())
    }

    /// Fraud service to use for this payment.
    pub fn set_fraud_service(&mut self, service: FraudService) -> &mut Self {
        self.put("fraud_service", service)
    }

    /// Customer details.
    pub fn set_customer_info(&mut self, customer: &CustomerInfo) -> &mut Self {
        self.put("customer_info", customer)
    }

    /// Order lines.
    pub fn set_order_lines(&mut self, lines: &[OrderLine]) -> &mut Self {
        self.put("orderLines", OrderLine::list(lines))
    }

    /// Free-form key/value pairs echoed back as payment infos.
    pub fn set_transaction_info<K, V>(&mut self, info: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let pairs = info
            .into_iter()
            .map(|(key, value)| (key.into(), OptionValue::String(value.into())))
            .collect();
        self.put("transaction_info", OptionValue::Map(pairs))
    }

    /// Sends the reservation.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad parameters, or the classified
    /// transport, response or business error.
    pub async fn call(&mut self) -> Result<InvoiceReservationResponse> {
        self.core.execute::<Self>().await
    }
}

impl<T: Transport> Operation for InvoiceReservation<T> {
    type Transport = T;
    type Response = InvoiceReservationResponse;

    const META: OperationMeta = OperationMeta {
        name: "InvoiceReservation",
        method: HttpMethod::Post,
        endpoint: "createInvoiceReservation",
    };

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::Authentication,
        error::{ErrorKind, GatewayError},
        options::RawParameters,
        transport::MockTransport,
    };

    type Reservation = InvoiceReservation<MockTransport>;

    fn minimal() -> RawParameters {
        [
            ("terminal", OptionValue::from("T1")),
            ("shop_orderid", OptionValue::from("O1")),
            ("amount", OptionValue::from(Decimal::new(3533, 2))),
            ("currency", OptionValue::from("DKK")),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_schema_builds() {
        let schema = Reservation::schema().unwrap();
        assert_eq!(
            schema.required_keys().collect::<Vec<_>>(),
            ["terminal", "shop_orderid", "amount", "currency", "type", "payment_source"]
        );
        assert!(schema.is_defined("orderLines"));
        assert!(schema.is_defined("fraud_service"));
    }

    #[test]
    fn test_defaults_applied() {
        let resolved = Reservation::schema().unwrap().resolve(&minimal()).unwrap();
        assert_eq!(resolved.get("type").and_then(OptionValue::as_str), Some("payment"));
        assert_eq!(resolved.get("payment_source").and_then(OptionValue::as_str), Some("eCommerce"));
        assert!(resolved.get("fraud_service").is_none());
    }

    #[test]
    fn test_unknown_fraud_service_rejected() {
        let mut raw = minimal();
        raw.set("fraud_service", "unknown");
        let error = Reservation::schema().unwrap().resolve(&raw).unwrap_err();
        match error {
            GatewayError::InvalidOptionValue { key, value, .. } => {
                assert_eq!(key, "fraud_service");
                assert_eq!(value, "unknown");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_wrong_type_for_bank_code() {
        let mut raw = minimal();
        raw.set("bankCode", 1234_i64);
        let error = Reservation::schema().unwrap().resolve(&raw).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidOptionType);
    }

    #[test]
    fn test_setters_fill_parameters() {
        let mut op = Reservation::new(Authentication::new("u", "p"), Arc::new(MockTransport::new()));
        op.set_terminal("T1")
            .set_type(PaymentType::PaymentAndCapture)
            .set_fraud_service(FraudService::Maxmind)
            .set_transaction_info([("auxkey", "aux data")]);

        let params = op.parameters();
        assert_eq!(params.get("type").and_then(OptionValue::as_str), Some("paymentAndCapture"));
        assert_eq!(params.get("fraud_service").and_then(OptionValue::as_str), Some("maxmind"));
        assert_eq!(
            params.get("transaction_info"),
            Some(&OptionValue::Map(vec![("auxkey".to_owned(), OptionValue::from("aux data"))]))
        );
    }
}
