//! Typed response objects and their descriptors.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::{
    descriptor::{FieldDescriptor, FieldKind, TypeDescriptor},
    deserialize::{FromXml, XmlObject},
};
use crate::error::Result;

static HEADER: TypeDescriptor = TypeDescriptor {
    name: "Header",
    fields: &[
        FieldDescriptor::element("Date", FieldKind::Date),
        FieldDescriptor::element("Path", FieldKind::Text),
        FieldDescriptor::element("ErrorCode", FieldKind::Integer),
        FieldDescriptor::element("ErrorMessage", FieldKind::Text),
    ],
};

/// The `<Header>` section of every response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeader {
    /// Server timestamp.
    pub date: Option<DateTime<Utc>>,
    /// API path that served the request.
    pub path: Option<String>,
    /// `0` on success; an absent code counts as success.
    pub error_code: i64,
    /// Description of a non-zero `error_code`.
    pub error_message: Option<String>,
}

impl ResponseHeader {
    /// Returns true when the gateway reported no error.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.error_code == 0
    }
}

impl FromXml for ResponseHeader {
    fn descriptor() -> &'static TypeDescriptor {
        &HEADER
    }

    fn from_object(object: &XmlObject) -> Result<Self> {
        Ok(Self {
            date: object.date("Date"),
            path: object.string("Path"),
            error_code: object.integer("ErrorCode").unwrap_or(0),
            error_message: object.string("ErrorMessage").filter(|m| !m.is_empty()),
        })
    }
}

static ADDRESS: TypeDescriptor = TypeDescriptor {
    name: "Address",
    fields: &[
        FieldDescriptor::element("Firstname", FieldKind::Text),
        FieldDescriptor::element("Lastname", FieldKind::Text),
        FieldDescriptor::element("Address", FieldKind::Text),
        FieldDescriptor::element("City", FieldKind::Text),
        FieldDescriptor::element("Region", FieldKind::Text),
        FieldDescriptor::element("PostalCode", FieldKind::Text),
        FieldDescriptor::element("Country", FieldKind::Text),
    ],
};

/// Postal address as reported by the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    /// First name.
    pub firstname: Option<String>,
    /// Last name.
    pub lastname: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Region or state.
    pub region: Option<String>,
    /// Postal code.
    pub postal_code: Option<String>,
    /// Country code.
    pub country: Option<String>,
}

impl FromXml for Address {
    fn descriptor() -> &'static TypeDescriptor {
        &ADDRESS
    }

    fn from_object(object: &XmlObject) -> Result<Self> {
        Ok(Self {
            firstname: object.string("Firstname"),
            lastname: object.string("Lastname"),
            address: object.string("Address"),
            city: object.string("City"),
            region: object.string("Region"),
            postal_code: object.string("PostalCode"),
            country: object.string("Country"),
        })
    }
}

static TEXT_INFO: TypeDescriptor = TypeDescriptor {
    name: "TextInfo",
    fields: &[
        FieldDescriptor::element("Name", FieldKind::Text),
        FieldDescriptor::element("Value", FieldKind::Text),
    ],
};

/// Name/value pair printed on an invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInfo {
    /// Label.
    pub name: String,
    /// Value.
    pub value: String,
}

impl FromXml for TextInfo {
    fn descriptor() -> &'static TypeDescriptor {
        &TEXT_INFO
    }

    fn from_object(object: &XmlObject) -> Result<Self> {
        Ok(Self {
            name: object.string("Name").unwrap_or_default(),
            value: object.string("Value").unwrap_or_default(),
        })
    }
}

static PAYMENT_INFO: TypeDescriptor = TypeDescriptor {
    name: "PaymentInfo",
    fields: &[
        FieldDescriptor::attribute("name", FieldKind::Text),
        FieldDescriptor::text("value", FieldKind::Text),
    ],
};

/// `<PaymentInfo name="...">value</PaymentInfo>` entry echoed from `transaction_info`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentInfo {
    /// Key as sent in `transaction_info`.
    pub name: String,
    /// Value.
    pub value: String,
}

impl FromXml for PaymentInfo {
    fn descriptor() -> &'static TypeDescriptor {
        &PAYMENT_INFO
    }

    fn from_object(object: &XmlObject) -> Result<Self> {
        Ok(Self {
            name: object.string("name").unwrap_or_default(),
            value: object.string("value").unwrap_or_default(),
        })
    }
}

static CUSTOMER_DETAILS: TypeDescriptor = TypeDescriptor {
    name: "CustomerInfo",
    fields: &[
        FieldDescriptor::element("UserAgent", FieldKind::Text),
        FieldDescriptor::element("IpAddress", FieldKind::Text),
        FieldDescriptor::element("Email", FieldKind::Text),
        FieldDescriptor::element("Username", FieldKind::Text),
        FieldDescriptor::element("CustomerPhone", FieldKind::Text),
        FieldDescriptor::element("OrganisationNumber", FieldKind::Text),
        FieldDescriptor::element("BillingAddress", FieldKind::Nested(&ADDRESS)),
        FieldDescriptor::element("ShippingAddress", FieldKind::Nested(&ADDRESS)),
        FieldDescriptor::element("RegisteredAddress", FieldKind::Nested(&ADDRESS)),
    ],
};

/// Customer data attached to a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerDetails {
    /// Browser user agent.
    pub user_agent: Option<String>,
    /// Customer IP address.
    pub ip_address: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Username at the shop.
    pub username: Option<String>,
    /// Phone number.
    pub customer_phone: Option<String>,
    /// Company registration number.
    pub organisation_number: Option<String>,
    /// Billing address.
    pub billing_address: Option<Address>,
    /// Shipping address.
    pub shipping_address: Option<Address>,
    /// Address registered with the payment provider.
    pub registered_address: Option<Address>,
}

impl FromXml for CustomerDetails {
    fn descriptor() -> &'static TypeDescriptor {
        &CUSTOMER_DETAILS
    }

    fn from_object(object: &XmlObject) -> Result<Self> {
        Ok(Self {
            user_agent: object.string("UserAgent"),
            ip_address: object.string("IpAddress"),
            email: object.string("Email"),
            username: object.string("Username"),
            customer_phone: object.string("CustomerPhone"),
            organisation_number: object.string("OrganisationNumber"),
            billing_address: object.nested("BillingAddress")?,
            shipping_address: object.nested("ShippingAddress")?,
            registered_address: object.nested("RegisteredAddress")?,
        })
    }
}

static TRANSACTION: TypeDescriptor = TypeDescriptor {
    name: "Transaction",
    fields: &[
        FieldDescriptor::element("TransactionId", FieldKind::Text),
        FieldDescriptor::element("PaymentId", FieldKind::Text),
        FieldDescriptor::element("AuthType", FieldKind::Text),
        FieldDescriptor::element("CardStatus", FieldKind::Text),
        FieldDescriptor::element("CreditCardToken", FieldKind::Text),
        FieldDescriptor::element("CreditCardMaskedPan", FieldKind::Text),
        FieldDescriptor::element("ThreeDSecureResult", FieldKind::Text),
        FieldDescriptor::element("LiableForChargeback", FieldKind::Text),
        FieldDescriptor::element("ShopOrderId", FieldKind::Text),
        FieldDescriptor::element("Shop", FieldKind::Text),
        FieldDescriptor::element("Terminal", FieldKind::Text),
        FieldDescriptor::element("TransactionStatus", FieldKind::Text),
        FieldDescriptor::element("ReasonCode", FieldKind::Text),
        FieldDescriptor::element("MerchantCurrency", FieldKind::Integer),
        FieldDescriptor::element("MerchantCurrencyAlpha", FieldKind::Text),
        FieldDescriptor::element("CardHolderCurrency", FieldKind::Integer),
        FieldDescriptor::element("CardHolderCurrencyAlpha", FieldKind::Text),
        FieldDescriptor::element("ReservedAmount", FieldKind::Decimal),
        FieldDescriptor::element("CapturedAmount", FieldKind::Decimal),
        FieldDescriptor::element("RefundedAmount", FieldKind::Decimal),
        FieldDescriptor::element("CreditedAmount", FieldKind::Decimal),
        FieldDescriptor::element("RecurringDefaultAmount", FieldKind::Decimal),
        FieldDescriptor::element("SurchargeAmount", FieldKind::Decimal),
        FieldDescriptor::element("CreatedDate", FieldKind::Date),
        FieldDescriptor::element("UpdatedDate", FieldKind::Date),
        FieldDescriptor::element("PaymentNature", FieldKind::Text),
        FieldDescriptor::element("PaymentSchemeName", FieldKind::Text),
        FieldDescriptor::element("PaymentSource", FieldKind::Text),
        FieldDescriptor::element("FraudRiskScore", FieldKind::Decimal),
        FieldDescriptor::element("FraudRecommendation", FieldKind::Text),
        FieldDescriptor::element(
            "PaymentInfos",
            FieldKind::List { item: "PaymentInfo", of: &PAYMENT_INFO },
        ),
        FieldDescriptor::element("CustomerInfo", FieldKind::Nested(&CUSTOMER_DETAILS)),
    ],
};

/// A payment as the gateway reports it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transaction {
    /// Gateway transaction id.
    pub transaction_id: String,
    /// Payment id.
    pub payment_id: Option<String>,
    /// Authorization type, e.g. `payment` or `paymentAndCapture`.
    pub auth_type: Option<String>,
    /// Card status.
    pub card_status: Option<String>,
    /// Token for the card used.
    pub credit_card_token: Option<String>,
    /// Masked card number.
    pub credit_card_masked_pan: Option<String>,
    /// 3-D Secure outcome.
    pub three_d_secure_result: Option<String>,
    /// Party liable for chargebacks.
    pub liable_for_chargeback: Option<String>,
    /// Order id supplied by the shop.
    pub shop_order_id: Option<String>,
    /// Shop name.
    pub shop: Option<String>,
    /// Terminal name.
    pub terminal: Option<String>,
    /// Transaction status, e.g. `preauth` or `captured`.
    pub transaction_status: Option<String>,
    /// Reason code.
    pub reason_code: Option<String>,
    /// Merchant currency, ISO 4217 numeric.
    pub merchant_currency: Option<i64>,
    /// Merchant currency, ISO 4217 alpha.
    pub merchant_currency_alpha: Option<String>,
    /// Card holder currency, ISO 4217 numeric.
    pub card_holder_currency: Option<i64>,
    /// Card holder currency, ISO 4217 alpha.
    pub card_holder_currency_alpha: Option<String>,
    /// Reserved amount.
    pub reserved_amount: Option<Decimal>,
    /// Captured amount.
    pub captured_amount: Option<Decimal>,
    /// Refunded amount.
    pub refunded_amount: Option<Decimal>,
    /// Credited amount.
    pub credited_amount: Option<Decimal>,
    /// Default amount for recurring charges.
    pub recurring_default_amount: Option<Decimal>,
    /// Surcharge amount.
    pub surcharge_amount: Option<Decimal>,
    /// Creation time.
    pub created_date: Option<DateTime<Utc>>,
    /// Last update time.
    pub updated_date: Option<DateTime<Utc>>,
    /// Payment nature, e.g. `Invoice` or `CreditCard`.
    pub payment_nature: Option<String>,
    /// Payment scheme name.
    pub payment_scheme_name: Option<String>,
    /// Payment source, e.g. `eCommerce`.
    pub payment_source: Option<String>,
    /// Fraud risk score.
    pub fraud_risk_score: Option<Decimal>,
    /// Fraud service recommendation.
    pub fraud_recommendation: Option<String>,
    /// Echoed `transaction_info` entries.
    pub payment_infos: Vec<PaymentInfo>,
    /// Customer data.
    pub customer_info: Option<CustomerDetails>,
}

impl FromXml for Transaction {
    fn descriptor() -> &'static TypeDescriptor {
        &TRANSACTION
    }

    fn from_object(object: &XmlObject) -> Result<Self> {
        Ok(Self {
            transaction_id: object.string("TransactionId").unwrap_or_default(),
            payment_id: object.string("PaymentId"),
            auth_type: object.string("AuthType"),
            card_status: object.string("CardStatus"),
            credit_card_token: object.string("CreditCardToken"),
            credit_card_masked_pan: object.string("CreditCardMaskedPan"),
            three_d_secure_result: object.string("ThreeDSecureResult"),
            liable_for_chargeback: object.string("LiableForChargeback"),
            shop_order_id: object.string("ShopOrderId"),
            shop: object.string("Shop"),
            terminal: object.string("Terminal"),
            transaction_status: object.string("TransactionStatus"),
            reason_code: object.string("ReasonCode"),
            merchant_currency: object.integer("MerchantCurrency"),
            merchant_currency_alpha: object.string("MerchantCurrencyAlpha"),
            card_holder_currency: object.integer("CardHolderCurrency"),
            card_holder_currency_alpha: object.string("CardHolderCurrencyAlpha"),
            reserved_amount: object.decimal("ReservedAmount"),
            captured_amount: object.decimal("CapturedAmount"),
            refunded_amount: object.decimal("RefundedAmount"),
            credited_amount: object.decimal("CreditedAmount"),
            recurring_default_amount: object.decimal("RecurringDefaultAmount"),
            surcharge_amount: object.decimal("SurchargeAmount"),
            created_date: object.date("CreatedDate"),
            updated_date: object.date("UpdatedDate"),
            payment_nature: object.string("PaymentNature"),
            payment_scheme_name: object.string("PaymentSchemeName"),
            payment_source: object.string("PaymentSource"),
            fraud_risk_score: object.decimal("FraudRiskScore"),
            fraud_recommendation: object.string("FraudRecommendation"),
            payment_infos: object.items("PaymentInfos")?,
            customer_info: object.nested("CustomerInfo")?,
        })
    }
}

/// Body fields shared by responses that report an outcome.
fn outcome(object: &XmlObject) -> (String, Option<String>, Option<String>) {
    let non_empty = |name: &str| object.string(name).filter(|s| !s.is_empty());
    (
        object.string("Result").unwrap_or_default(),
        non_empty("MerchantErrorMessage"),
        non_empty("CardHolderErrorMessage"),
    )
}

/// Responses whose body carries a `<Result>` element.
pub trait HasOutcome {
    /// The `<Result>` text, e.g. `Success`, `Error` or `Open`.
    fn result(&self) -> &str;

    /// Merchant-facing error message.
    fn merchant_error_message(&self) -> Option<&str> {
        None
    }

    /// Error message meant for the card holder.
    fn cardholder_error_message(&self) -> Option<&str> {
        None
    }

    /// Returns true when the gateway embedded a failure in a 2xx response.
    fn is_embedded_error(&self) -> bool {
        self.result().eq_ignore_ascii_case("error")
    }
}

static INVOICE_RESERVATION: TypeDescriptor = TypeDescriptor {
    name: "InvoiceReservationResponse",
    fields: &[
        FieldDescriptor::element("Result", FieldKind::Text),
        FieldDescriptor::element("MerchantErrorMessage", FieldKind::Text),
        FieldDescriptor::element("CardHolderErrorMessage", FieldKind::Text),
        FieldDescriptor::element("CardHolderMessageMustBeShown", FieldKind::Boolean),
        FieldDescriptor::element(
            "Transactions",
            FieldKind::List { item: "Transaction", of: &TRANSACTION },
        ),
    ],
};

/// Body of a `createInvoiceReservation` response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoiceReservationResponse {
    /// Outcome, e.g. `Success`.
    pub result: String,
    /// Merchant-facing error message.
    pub merchant_error_message: Option<String>,
    /// Error message meant for the card holder.
    pub cardholder_error_message: Option<String>,
    /// Whether `cardholder_error_message` must be displayed.
    pub cardholder_message_must_be_shown: bool,
    /// Transactions created or touched by the call.
    pub transactions: Vec<Transaction>,
}

impl FromXml for InvoiceReservationResponse {
    fn descriptor() -> &'static TypeDescriptor {
        &INVOICE_RESERVATION
    }

    fn from_object(object: &XmlObject) -> Result<Self> {
        let (result, merchant_error_message, cardholder_error_message) = outcome(object);
        Ok(Self {
            result,
            merchant_error_message,
            cardholder_error_message,
            cardholder_message_must_be_shown: object
                .boolean("CardHolderMessageMustBeShown")
                .unwrap_or(false),
            transactions: object.items("Transactions")?,
        })
    }
}

impl HasOutcome for InvoiceReservationResponse {
    fn result(&self) -> &str {
        &self.result
    }

    fn merchant_error_message(&self) -> Option<&str> {
        self.merchant_error_message.as_deref()
    }

    fn cardholder_error_message(&self) -> Option<&str> {
        self.cardholder_error_message.as_deref()
    }
}

static INVOICE_TEXT: TypeDescriptor = TypeDescriptor {
    name: "InvoiceTextResponse",
    fields: &[
        FieldDescriptor::element("Result", FieldKind::Text),
        FieldDescriptor::element("MerchantErrorMessage", FieldKind::Text),
        FieldDescriptor::element("CardHolderErrorMessage", FieldKind::Text),
        FieldDescriptor::element("AccountOfferMinimumToPay", FieldKind::Decimal),
        FieldDescriptor::element("AccountOfferText", FieldKind::Text),
        FieldDescriptor::element("BankAccountNumber", FieldKind::Text),
        FieldDescriptor::element("LogonText", FieldKind::Text),
        FieldDescriptor::element("OcrNumber", FieldKind::Text),
        FieldDescriptor::element("MandatoryInvoiceText", FieldKind::Text),
        FieldDescriptor::element("InvoiceNumber", FieldKind::Text),
        FieldDescriptor::element("CustomerNumber", FieldKind::Text),
        FieldDescriptor::element("InvoiceDate", FieldKind::Date),
        FieldDescriptor::element("DueDate", FieldKind::Date),
        FieldDescriptor::element("TextInfos", FieldKind::List { item: "TextInfo", of: &TEXT_INFO }),
        FieldDescriptor::element("Address", FieldKind::Nested(&ADDRESS)),
    ],
};

/// Body of a `getInvoiceText` response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoiceTextResponse {
    /// Outcome, e.g. `Success`.
    pub result: String,
    /// Merchant-facing error message.
    pub merchant_error_message: Option<String>,
    /// Error message meant for the card holder.
    pub cardholder_error_message: Option<String>,
    /// Minimum amount for an account offer.
    pub account_offer_minimum_to_pay: Option<Decimal>,
    /// Account offer text.
    pub account_offer_text: Option<String>,
    /// Bank account to pay into.
    pub bank_account_number: Option<String>,
    /// Text explaining how to log on to the invoice portal.
    pub logon_text: Option<String>,
    /// OCR reference.
    pub ocr_number: Option<String>,
    /// Text that must be printed on the invoice.
    pub mandatory_invoice_text: Option<String>,
    /// Invoice number.
    pub invoice_number: Option<String>,
    /// Customer number.
    pub customer_number: Option<String>,
    /// Invoice date.
    pub invoice_date: Option<DateTime<Utc>>,
    /// Due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Extra labelled values.
    pub text_infos: Vec<TextInfo>,
    /// Invoice address.
    pub address: Option<Address>,
}

impl FromXml for InvoiceTextResponse {
    fn descriptor() -> &'static TypeDescriptor {
        &INVOICE_TEXT
    }

    fn from_object(object: &XmlObject) -> Result<Self> {
        let (result, merchant_error_message, cardholder_error_message) = outcome(object);
        Ok(Self {
            result,
            merchant_error_message,
            cardholder_error_message,
            account_offer_minimum_to_pay: object.decimal("AccountOfferMinimumToPay"),
            account_offer_text: object.string("AccountOfferText"),
            bank_account_number: object.string("BankAccountNumber"),
            logon_text: object.string("LogonText"),
            ocr_number: object.string("OcrNumber"),
            mandatory_invoice_text: object.string("MandatoryInvoiceText"),
            invoice_number: object.string("InvoiceNumber"),
            customer_number: object.string("CustomerNumber"),
            invoice_date: object.date("InvoiceDate"),
            due_date: object.date("DueDate"),
            text_infos: object.items("TextInfos")?,
            address: object.nested("Address")?,
        })
    }
}

impl HasOutcome for InvoiceTextResponse {
    fn result(&self) -> &str {
        &self.result
    }

    fn merchant_error_message(&self) -> Option<&str> {
        self.merchant_error_message.as_deref()
    }

    fn cardholder_error_message(&self) -> Option<&str> {
        self.cardholder_error_message.as_deref()
    }
}

static TEST_AUTHENTICATION: TypeDescriptor = TypeDescriptor {
    name: "TestAuthenticationResponse",
    fields: &[FieldDescriptor::element("Result", FieldKind::Text)],
};

/// Body of a `testAuthentication` response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestAuthenticationResponse {
    /// Outcome; `OK` when the credentials were accepted.
    pub result: String,
}

impl FromXml for TestAuthenticationResponse {
    fn descriptor() -> &'static TypeDescriptor {
        &TEST_AUTHENTICATION
    }

    fn from_object(object: &XmlObject) -> Result<Self> {
        Ok(Self { result: object.string("Result").unwrap_or_default() })
    }
}

impl HasOutcome for TestAuthenticationResponse {
    fn result(&self) -> &str {
        &self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::xml::parse;

    fn body<T: FromXml>(xml: &str) -> T {
        T::from_element(&parse(xml.as_bytes()).unwrap()).unwrap()
    }

    #[test]
    fn test_header_defaults_to_success() {
        let header: ResponseHeader =
            body("<Header><Date>2016-11-24T10:47:06+01:00</Date><ErrorMessage/></Header>");
        assert!(header.is_ok());
        assert!(header.date.is_some());
        assert_eq!(header.error_message, None);
    }

    #[test]
    fn test_transaction_without_address() {
        let transaction: Transaction = body(
            "<Transaction>
               <TransactionId>123</TransactionId>
               <ReservedAmount>35.33</ReservedAmount>
               <MerchantCurrency>208</MerchantCurrency>
               <PaymentInfos>
                 <PaymentInfo name=\"auxkey\">aux data</PaymentInfo>
                 <PaymentInfo name=\"other\">x</PaymentInfo>
               </PaymentInfos>
               <CustomerInfo><Email>a@example.com</Email></CustomerInfo>
             </Transaction>",
        );
        assert_eq!(transaction.transaction_id, "123");
        assert_eq!(transaction.reserved_amount, Some(Decimal::new(3533, 2)));
        assert_eq!(transaction.merchant_currency, Some(208));
        assert_eq!(transaction.payment_infos.len(), 2);
        assert_eq!(transaction.payment_infos[0].name, "auxkey");
        assert_eq!(transaction.payment_infos[0].value, "aux data");

        let customer = transaction.customer_info.unwrap();
        assert_eq!(customer.email.as_deref(), Some("a@example.com"));
        assert!(customer.billing_address.is_none());
    }

    #[test]
    fn test_reservation_body_keeps_transaction_order() {
        let response: InvoiceReservationResponse = body(
            "<Body>
               <Result>Success</Result>
               <CardHolderMessageMustBeShown>false</CardHolderMessageMustBeShown>
               <Transactions>
                 <Transaction><TransactionId>1</TransactionId></Transaction>
                 <Transaction><TransactionId>2</TransactionId></Transaction>
                 <Transaction><TransactionId>3</TransactionId></Transaction>
               </Transactions>
             </Body>",
        );
        let ids: Vec<&str> = response.transactions.iter().map(|t| t.transaction_id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
        assert!(!response.is_embedded_error());
    }

    #[test]
    fn test_embedded_error_detection() {
        let response: InvoiceReservationResponse = body(
            "<Body><Result>Error</Result><MerchantErrorMessage>declined</MerchantErrorMessage>\
             <CardHolderErrorMessage/></Body>",
        );
        assert!(response.is_embedded_error());
        assert_eq!(response.merchant_error_message(), Some("declined"));
        assert_eq!(response.cardholder_error_message(), None);
        assert!(response.transactions.is_empty());
    }
}
