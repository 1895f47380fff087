use std::{collections::BTreeMap, str::FromStr, sync::Arc};

use cards::{CardExpiration, CardNumber};
use common_enums::{CountryAlpha2, GatewayMode, StandardErrorCode};
use common_utils::{consts, pii::Email, MinorUnit};
use domain_types::{
    connector_types::{ConnectorEnum, PaymentOptions},
    errors::ConnectorError,
    gateway_response::AuthorizationToken,
    payment_address::Address,
    payment_method_data::{Card, PaymentMethodData},
    router_data::ConnectorAuthType,
    types::{ConnectorParams, Connectors},
};
use hyperswitch_masking::Secret;
use interfaces::gateway::PaymentGateway;

use crate::{
    gateway::ConnectorGateway,
    types::{test_utils::MockTransport, ConnectorData},
};

const SECURITY_KEY: &str = "6457Thfj624V5r7WUwc5v6a68Zsd6YEm";

const SALE_APPROVED: &str = "response=1&responsetext=SUCCESS&authcode=123456&transactionid=7460617254&avsresponse=N&cvvresponse=M&orderid=1&type=sale&response_code=100";

const AUTH_APPROVED: &str = "response=1&responsetext=SUCCESS&authcode=123456&transactionid=7460617255&avsresponse=Y&cvvresponse=M&orderid=1&type=auth&response_code=100";

const SALE_DECLINED: &str = "response=2&responsetext=DECLINE&authcode=&transactionid=7460617256&avsresponse=N&cvvresponse=N&orderid=1&type=sale&response_code=200";

const FOLLOW_UP_APPROVED: &str = "response=1&responsetext=SUCCESS&authcode=123456&transactionid=7460617255&avsresponse=&cvvresponse=&orderid=&type=capture&response_code=100";

const VAULT_ADDED: &str = "response=1&responsetext=Customer Added&authcode=&transactionid=&avsresponse=&cvvresponse=&orderid=&type=&response_code=100&customer_vault_id=1887384767";

const VAULT_DELETED: &str = "response=1&responsetext=Customer Deleted&authcode=&transactionid=&avsresponse=&cvvresponse=&orderid=&type=&response_code=100";

fn card() -> Card {
    Card {
        number: CardNumber::from_str("4111111111111111").unwrap(),
        expiration: CardExpiration::new(9, 2035).unwrap(),
        cvc: Some(Secret::new("123".to_string())),
        first_name: Some(Secret::new("Longbob".to_string())),
        last_name: Some(Secret::new("Longsen".to_string())),
    }
}

fn options() -> PaymentOptions {
    PaymentOptions {
        order_id: Some("1".to_string()),
        description: Some("Store purchase".to_string()),
        email: Some(Email::from_str("joe@example.com").unwrap()),
        billing_address: Some(Address {
            address1: Some(Secret::new("456 My Street".to_string())),
            city: Some("Ottawa".to_string()),
            state: Some(Secret::new("ON".to_string())),
            zip: Some(Secret::new("K1C2N6".to_string())),
            country: Some(CountryAlpha2::CA),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn gateway_with(auth: ConnectorAuthType, transport: Arc<MockTransport>) -> ConnectorGateway {
    let connectors = Connectors {
        nmi: ConnectorParams::new("https://secure.nmi.com/", None),
        ..Default::default()
    };
    ConnectorGateway::new(
        ConnectorData::get_connector_by_name(&ConnectorEnum::Nmi),
        auth,
        connectors,
        GatewayMode::Test,
        transport,
    )
}

fn gateway(transport: Arc<MockTransport>) -> ConnectorGateway {
    gateway_with(
        ConnectorAuthType::HeaderKey {
            api_key: Secret::new(SECURITY_KEY.to_string()),
        },
        transport,
    )
}

fn form(body: Option<String>) -> BTreeMap<String, String> {
    serde_urlencoded::from_str(&body.unwrap()).unwrap()
}

fn field<'a>(form: &'a BTreeMap<String, String>, key: &str) -> Option<&'a str> {
    form.get(key).map(String::as_str)
}

#[tokio::test]
async fn successful_purchase() {
    let transport = MockTransport::new(vec![MockTransport::ok(SALE_APPROVED)]);
    let response = gateway(transport.clone())
        .purchase(MinorUnit::new(100), &card().into(), &options())
        .await
        .unwrap();

    assert!(response.is_success());
    assert!(response.is_test());
    assert_eq!(response.message(), "SUCCESS");
    assert_eq!(response.authorization().unwrap().to_string(), "7460617254");
    assert_eq!(response.avs_result().code.as_deref(), Some("N"));
    assert_eq!(response.cvv_result().code.as_deref(), Some("M"));
    assert_eq!(response.param("authcode"), Some("123456"));

    let request = transport.last_request();
    assert_eq!(request.url, "https://secure.nmi.com/api/transact.php");
    assert_eq!(
        request.headers.get("Content-Type").map(String::as_str),
        Some("application/x-www-form-urlencoded")
    );

    let body = form(request.body);
    assert_eq!(field(&body, "security_key"), Some(SECURITY_KEY));
    assert_eq!(field(&body, "type"), Some("sale"));
    assert_eq!(field(&body, "amount"), Some("1.00"));
    assert_eq!(field(&body, "currency"), Some("USD"));
    assert_eq!(field(&body, "ccnumber"), Some("4111111111111111"));
    assert_eq!(field(&body, "ccexp"), Some("0935"));
    assert_eq!(field(&body, "cvv"), Some("123"));
    assert_eq!(field(&body, "first_name"), Some("Longbob"));
    assert_eq!(field(&body, "last_name"), Some("Longsen"));
    assert_eq!(field(&body, "orderid"), Some("1"));
    assert_eq!(field(&body, "order_description"), Some("Store purchase"));
    assert_eq!(field(&body, "email"), Some("joe@example.com"));
    assert_eq!(field(&body, "address1"), Some("456 My Street"));
    assert_eq!(field(&body, "state"), Some("ON"));
    assert_eq!(field(&body, "zip"), Some("K1C2N6"));
    assert_eq!(field(&body, "country"), Some("CA"));
    assert!(!body.contains_key("address2"));
}

#[tokio::test]
async fn declined_purchase() {
    let transport = MockTransport::new(vec![MockTransport::ok(SALE_DECLINED)]);
    let response = gateway(transport)
        .purchase(MinorUnit::new(99), &card().into(), &options())
        .await
        .unwrap();

    assert!(!response.is_success());
    assert_eq!(response.message(), "DECLINE");
    assert_eq!(response.error_code(), Some(StandardErrorCode::CardDeclined));
    assert_eq!(response.param("response_code"), Some("200"));
}

#[tokio::test]
async fn authorize_and_capture() {
    let transport = MockTransport::new(vec![
        MockTransport::ok(AUTH_APPROVED),
        MockTransport::ok(FOLLOW_UP_APPROVED),
    ]);
    let gateway = gateway(transport.clone());

    let auth = gateway
        .authorize(MinorUnit::new(100), &card().into(), &options())
        .await
        .unwrap();
    assert!(auth.is_success());
    assert_eq!(field(&form(transport.last_request().body), "type"), Some("auth"));

    let capture = gateway
        .capture(
            MinorUnit::new(100),
            auth.authorization().unwrap(),
            &PaymentOptions::default(),
        )
        .await
        .unwrap();
    assert!(capture.is_success());

    let body = form(transport.last_request().body);
    assert_eq!(field(&body, "type"), Some("capture"));
    assert_eq!(field(&body, "transactionid"), Some("7460617255"));
    assert_eq!(field(&body, "amount"), Some("1.00"));
    assert!(!body.contains_key("ccnumber"));
}

#[tokio::test]
async fn refund_and_void() {
    let transport = MockTransport::new(vec![
        MockTransport::ok(FOLLOW_UP_APPROVED),
        MockTransport::ok(FOLLOW_UP_APPROVED),
    ]);
    let gateway = gateway(transport.clone());
    let authorization = AuthorizationToken::single("7460617254");

    let refund = gateway
        .refund(MinorUnit::new(50), &authorization, &PaymentOptions::default())
        .await
        .unwrap();
    assert!(refund.is_success());
    let body = form(transport.last_request().body);
    assert_eq!(field(&body, "type"), Some("refund"));
    assert_eq!(field(&body, "amount"), Some("0.50"));

    let void = gateway
        .void(&authorization, &PaymentOptions::default())
        .await
        .unwrap();
    assert!(void.is_success());
    let body = form(transport.last_request().body);
    assert_eq!(field(&body, "type"), Some("void"));
    assert_eq!(field(&body, "transactionid"), Some("7460617254"));
    assert!(!body.contains_key("amount"));
}

#[tokio::test]
async fn verify_uses_validate() {
    let transport = MockTransport::new(vec![MockTransport::ok(
        "response=1&responsetext=SUCCESS&authcode=&transactionid=7460617257&avsresponse=N&cvvresponse=M&orderid=1&type=validate&response_code=100",
    )]);
    let response = gateway(transport.clone())
        .verify(&card().into(), &options())
        .await
        .unwrap();

    assert!(response.is_success());
    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    let body = form(requests[0].body.clone());
    assert_eq!(field(&body, "type"), Some("validate"));
    assert!(!body.contains_key("amount"));
}

#[tokio::test]
async fn store_then_unstore() {
    let transport = MockTransport::new(vec![
        MockTransport::ok(VAULT_ADDED),
        MockTransport::ok(VAULT_DELETED),
    ]);
    let gateway = gateway(transport.clone());

    let stored = gateway.store(&card().into(), &options()).await.unwrap();
    assert!(stored.is_success());
    assert_eq!(stored.message(), "Customer Added");
    let token = stored.authorization().unwrap().clone();
    assert_eq!(token.to_string(), "1887384767");

    let body = form(transport.last_request().body);
    assert_eq!(field(&body, "customer_vault"), Some("add_customer"));
    assert_eq!(field(&body, "ccnumber"), Some("4111111111111111"));
    assert!(!body.contains_key("type"));

    let unstored = gateway
        .unstore(&token, &PaymentOptions::default())
        .await
        .unwrap();
    assert!(unstored.is_success());
    let body = form(transport.last_request().body);
    assert_eq!(field(&body, "customer_vault"), Some("delete_customer"));
    assert_eq!(field(&body, "customer_vault_id"), Some("1887384767"));
    assert!(!body.contains_key("ccnumber"));
}

#[tokio::test]
async fn purchase_with_vaulted_customer() {
    let transport = MockTransport::new(vec![MockTransport::ok(SALE_APPROVED)]);
    let token = PaymentMethodData::Token(Secret::new("1887384767".to_string()));
    let response = gateway(transport.clone())
        .purchase(MinorUnit::new(100), &token, &PaymentOptions::default())
        .await
        .unwrap();

    assert!(response.is_success());
    let body = form(transport.last_request().body);
    assert_eq!(field(&body, "customer_vault_id"), Some("1887384767"));
    assert!(!body.contains_key("ccnumber"));
    assert!(!body.contains_key("ccexp"));
}

#[tokio::test]
async fn international_and_shipping_addresses() {
    let transport = MockTransport::new(vec![MockTransport::ok(SALE_APPROVED)]);
    let options = PaymentOptions {
        billing_address: Some(Address {
            address1: Some(Secret::new("Unter den Linden 1".to_string())),
            city: Some("Berlin".to_string()),
            state: Some(Secret::new(" ".to_string())),
            country: Some(CountryAlpha2::DE),
            ..Default::default()
        }),
        shipping_address: Some(Address {
            name: Some(Secret::new("Jim Smith".to_string())),
            address1: Some(Secret::new("1 Shipping Way".to_string())),
            state: Some(Secret::new("CO".to_string())),
            country: Some(CountryAlpha2::US),
            phone: Some(Secret::new("555-555-5555".to_string())),
            ..Default::default()
        }),
        ..Default::default()
    };
    gateway(transport.clone())
        .purchase(MinorUnit::new(100), &card().into(), &options)
        .await
        .unwrap();

    let body = form(transport.last_request().body);
    assert_eq!(field(&body, "state"), Some("n/a"));
    assert_eq!(field(&body, "country"), Some("DE"));
    assert_eq!(field(&body, "shipping_address1"), Some("1 Shipping Way"));
    assert_eq!(field(&body, "shipping_state"), Some("CO"));
    assert_eq!(field(&body, "shipping_firstname"), Some("Jim"));
    assert_eq!(field(&body, "shipping_lastname"), Some("Smith"));
    assert!(!body.contains_key("shipping_phone"));
}

#[tokio::test]
async fn bad_security_key_is_an_authentication_failure() {
    let transport = MockTransport::new(vec![MockTransport::ok(
        "response=3&responsetext=Authentication Failed&authcode=&transactionid=0&avsresponse=&cvvresponse=&orderid=1&type=sale&response_code=300",
    )]);
    let response = gateway(transport)
        .purchase(MinorUnit::new(100), &card().into(), &options())
        .await
        .unwrap();

    assert!(!response.is_success());
    assert_eq!(response.message(), "Authentication Failed");
    assert_eq!(
        response.error_code(),
        Some(StandardErrorCode::AuthenticationFailure)
    );
}

#[tokio::test]
async fn unparsable_body_is_a_failed_response() {
    let transport = MockTransport::new(vec![MockTransport::http_error(
        502,
        "<html>Bad Gateway</html>",
    )]);
    let response = gateway(transport)
        .purchase(MinorUnit::new(100), &card().into(), &options())
        .await
        .unwrap();

    assert!(!response.is_success());
    assert_eq!(response.message(), consts::INVALID_RESPONSE_MESSAGE);
    assert_eq!(response.error_code(), Some(StandardErrorCode::UnparsableResponse));
    assert_eq!(response.param("status_code"), Some("502"));
}

#[tokio::test]
async fn malformed_authorization_is_rejected_before_sending() {
    let transport = MockTransport::new(vec![]);
    let error = gateway(transport.clone())
        .void(
            &AuthorizationToken::single("7460617254&type=sale"),
            &PaymentOptions::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        error.current_context(),
        ConnectorError::InvalidAuthorization { connector: "nmi", .. }
    ));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn signature_key_credentials_are_rejected() {
    let transport = MockTransport::new(vec![]);
    let error = gateway_with(
        ConnectorAuthType::SignatureKey {
            api_key: Secret::new("a".to_string()),
            key1: Secret::new("b".to_string()),
            api_secret: Secret::new("c".to_string()),
        },
        transport,
    )
    .purchase(MinorUnit::new(100), &card().into(), &options())
    .await
    .unwrap_err();

    assert_eq!(error.current_context(), &ConnectorError::FailedToObtainAuthType);
}

#[tokio::test]
async fn expired_card_is_a_failed_response_without_a_request() {
    let transport = MockTransport::new(vec![]);
    let expired = Card {
        expiration: CardExpiration::new(1, 2001).unwrap(),
        ..card()
    };
    let gateway = gateway(transport.clone());

    let response = gateway
        .purchase(MinorUnit::new(100), &expired.clone().into(), &options())
        .await
        .unwrap();
    assert!(!response.is_success());
    assert!(response.is_test());
    assert_eq!(response.message(), consts::EXPIRED_CARD_MESSAGE);
    assert_eq!(response.error_code(), Some(StandardErrorCode::ExpiredCard));

    let response = gateway.verify(&expired.into(), &options()).await.unwrap();
    assert_eq!(response.error_code(), Some(StandardErrorCode::ExpiredCard));
    assert!(transport.requests().is_empty());
}
