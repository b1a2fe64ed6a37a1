//! Integration tests for invoice reservations.
//!
//! Drives the full pipeline through the mock transport: validation, request
//! encoding, response mapping and error classification.

mod common;

use std::sync::Arc;

use altapay_sdk::{
    CallState, GatewayError, InvoiceReservation, Operation,
    error::{CallStage, ErrorKind},
    request::{BodyEncoding, HttpMethod},
    transport::MockTransport,
    types::{CustomerAddress, CustomerInfo, FraudService, GoodsType, OrderLine},
};
use chrono::{TimeZone, Utc};
use common::{auth, fixture, mock};
use rust_decimal::Decimal;

fn reservation(transport: &Arc<MockTransport>) -> InvoiceReservation<MockTransport> {
    let mut op = InvoiceReservation::new(auth(), Arc::clone(transport));
    op.set_terminal("T1")
        .set_shop_order_id("O1")
        .set_amount(Decimal::new(3533, 2))
        .set_currency("DKK");
    op
}

fn param<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
}

#[tokio::test]
async fn test_minimal_reservation_applies_defaults() {
    let transport = mock();
    transport.push_xml(200, &fixture("invoicereservation.xml"));
    let mut op = reservation(&transport);

    let response = op.call().await.unwrap();
    assert_eq!(response.result, "Success");
    assert_eq!(op.state(), CallState::Succeeded);

    let request = transport.last_request().unwrap();
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.body_encoding, BodyEncoding::FormUrlEncoded);
    assert_eq!(request.url, "https://testgateway.altapaysecure.com/merchant/API/createInvoiceReservation");
    assert_eq!(request.header("content-type"), Some("application/x-www-form-urlencoded"));
    assert!(request.header("authorization").unwrap().starts_with("Basic "));

    let params = request.parameters();
    assert_eq!(param(&params, "terminal"), Some("T1"));
    assert_eq!(param(&params, "shop_orderid"), Some("O1"));
    assert_eq!(param(&params, "amount"), Some("35.33"));
    assert_eq!(param(&params, "currency"), Some("DKK"));
    assert_eq!(param(&params, "type"), Some("payment"));
    assert_eq!(param(&params, "payment_source"), Some("eCommerce"));
    assert_eq!(param(&params, "fraud_service"), None);
    assert_eq!(op.raw_request(), Some(&request));
}

#[tokio::test]
async fn test_response_maps_transaction() {
    let transport = mock();
    transport.push_xml(200, &fixture("invoicereservation.xml"));
    let mut op = reservation(&transport);

    let response = op.call().await.unwrap();
    assert_eq!(response.transactions.len(), 1);
    let transaction = &response.transactions[0];
    assert_eq!(transaction.transaction_id, "123");
    assert_eq!(transaction.transaction_status.as_deref(), Some("invoice_initialized"));
    assert_eq!(transaction.reserved_amount, Some(Decimal::new(3533, 2)));
    assert_eq!(transaction.captured_amount, Some(Decimal::ZERO));
    assert_eq!(transaction.merchant_currency, Some(208));
    assert_eq!(
        transaction.created_date,
        Some(Utc.with_ymd_and_hms(2016, 11, 24, 10, 47, 5).unwrap())
    );
    assert_eq!(transaction.fraud_risk_score, Some(Decimal::from(13)));
    assert_eq!(transaction.payment_infos.len(), 1);
    assert_eq!(transaction.payment_infos[0].name, "auxkey");
    assert_eq!(transaction.payment_infos[0].value, "aux data (<&>)");

    let customer = transaction.customer_info.as_ref().unwrap();
    assert_eq!(customer.ip_address.as_deref(), Some("81.7.175.18"));
    let billing = customer.billing_address.as_ref().unwrap();
    assert_eq!(billing.city.as_deref(), Some("Copenhagen"));
    assert!(customer.shipping_address.is_none());

    let header = op.response_header().unwrap();
    assert_eq!(header.path.as_deref(), Some("API/createInvoiceReservation"));
}

#[tokio::test]
async fn test_customer_and_order_lines_are_flattened() {
    let transport = mock();
    transport.push_xml(200, &fixture("invoicereservation.xml"));
    let mut op = reservation(&transport);

    let customer = CustomerInfo {
        email: Some("buyer@example.com".to_owned()),
        billing: Some(CustomerAddress {
            firstname: Some("Jane".to_owned()),
            postal_code: Some("1111".to_owned()),
            ..CustomerAddress::default()
        }),
        ..CustomerInfo::default()
    };
    let lines = [
        OrderLine::new("Shoes", "sku-1", Decimal::from(2), Decimal::new(1500, 2)),
        OrderLine::new("Shipping", "ship", Decimal::ONE, Decimal::new(533, 2))
            .with_goods_type(GoodsType::Shipment),
    ];
    op.set_customer_info(&customer)
        .set_order_lines(&lines)
        .set_fraud_service(FraudService::Maxmind)
        .set_transaction_info([("auxkey", "aux data")]);
    op.call().await.unwrap();

    let params = transport.last_request().unwrap().parameters();
    assert_eq!(param(&params, "customer_info[email]"), Some("buyer@example.com"));
    assert_eq!(param(&params, "customer_info[billing_firstname]"), Some("Jane"));
    assert_eq!(param(&params, "customer_info[billing_postal]"), Some("1111"));
    assert_eq!(param(&params, "orderLines[0][description]"), Some("Shoes"));
    assert_eq!(param(&params, "orderLines[1][goodsType]"), Some("shipment"));
    assert_eq!(param(&params, "transaction_info[auxkey]"), Some("aux data"));
    assert_eq!(param(&params, "fraud_service"), Some("maxmind"));
}

#[tokio::test]
async fn test_unknown_fraud_service_fails_validation() {
    let transport = mock();
    let mut op = reservation(&transport);
    op.set("fraud_service", "unknown");

    let error = op.call().await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidOptionValue);
    assert_eq!(error.stage(), CallStage::Validation);
    assert!(error.exchange().is_none());
    assert_eq!(op.state(), CallState::Failed);
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_missing_terminal_fails_validation() {
    let transport = mock();
    let mut op = InvoiceReservation::new(auth(), Arc::clone(&transport));
    op.set_shop_order_id("O1").set_amount(Decimal::ONE).set_currency(208_i64);

    match op.call().await.unwrap_err() {
        GatewayError::MissingRequiredOption(key) => assert_eq!(key, "terminal"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_malformed_xml_is_not_a_business_error() {
    let transport = mock();
    transport.push_xml(200, "<APIResponse><Header><ErrorCode>0</ErrorCode></Header><Body>");
    let mut op = reservation(&transport);

    let error = op.call().await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::MalformedXml);
    assert!(!error.is_retryable());
    let exchange = error.exchange().unwrap();
    assert_eq!(exchange.response.as_ref().unwrap().status, 200);
}

#[tokio::test]
async fn test_embedded_error_in_success_status() {
    let transport = mock();
    transport.push_xml(200, &fixture("embedded_error.xml"));
    let mut op = reservation(&transport);

    match op.call().await.unwrap_err() {
        GatewayError::ResponseMessage { message, cardholder_message, exchange } => {
            assert_eq!(message, "Invoice reservation declined by acquirer");
            assert_eq!(
                cardholder_message.as_deref(),
                Some("Your invoice request could not be approved")
            );
            assert!(exchange.is_some());
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(op.state(), CallState::Failed);
}

#[tokio::test]
async fn test_error_status_with_body_is_client_error() {
    let transport = mock();
    transport.push_xml(400, &fixture("client_error.xml"));
    let mut op = reservation(&transport);

    let error = op.call().await.unwrap_err();
    assert_eq!(error.stage(), CallStage::Business);
    match &error {
        GatewayError::Client { status, code, message, .. } => {
            assert_eq!(*status, 400);
            assert_eq!(*code, 12);
            assert_eq!(message, "Unknown terminal: Nowhere Terminal");
        }
        other => panic!("unexpected error: {other}"),
    }
    let exchange = error.exchange().unwrap();
    assert_eq!(exchange.request.path, "/merchant/API/createInvoiceReservation");
    assert_eq!(exchange.response.as_ref().unwrap().status, 400);
    assert_eq!(op.raw_response().unwrap().status, 400);
}

#[tokio::test]
async fn test_error_status_without_body_is_network_error() {
    let transport = mock();
    transport.push_xml(503, "");
    let mut op = reservation(&transport);

    let error = op.call().await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Network);
    assert!(error.is_retryable());
    assert!(error.exchange().is_some());
}

#[tokio::test]
async fn test_connection_failure_is_network_error() {
    let transport = mock();
    transport.push_network_error("connection refused");
    let mut op = reservation(&transport);

    let error = op.call().await.unwrap_err();
    assert!(matches!(error, GatewayError::Network { ref message, .. } if message == "connection refused"));
    assert!(op.raw_response().is_none());
    assert!(op.raw_request().is_some());
}
