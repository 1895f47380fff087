use std::{str::FromStr, sync::Arc};

use cards::{CardExpiration, CardNumber};
use common_enums::{GatewayMode, StandardErrorCode};
use common_utils::{consts, MinorUnit};
use domain_types::{
    connector_types::{ConnectorEnum, PaymentOptions},
    errors::ConnectorError,
    gateway_response::AuthorizationToken,
    payment_method_data::{Card, PaymentMethodData},
    router_data::ConnectorAuthType,
    types::{ConnectorParams, Connectors},
};
use hyperswitch_masking::Secret;
use interfaces::gateway::PaymentGateway;

use super::strip_soap_namespaces;
use crate::{
    gateway::ConnectorGateway,
    types::{test_utils::MockTransport, ConnectorData},
};

fn dts_response(operation: &str, result: &str) -> String {
    let escaped = result.replace('<', "&lt;").replace('>', "&gt;");
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:xsd="http://www.w3.org/2001/XMLSchema">
  <soap:Body>
    <{operation}Response xmlns="http://www.ippayments.com.au/interface/api/dts">
      <{operation}Result>{escaped}</{operation}Result>
    </{operation}Response>
  </soap:Body>
</soap:Envelope>"#
    )
}

const APPROVED: &str = "<Response>\
<ResponseCode>0</ResponseCode>\
<Timestamp>20-Dec-2024 04:07:39</Timestamp>\
<Receipt>89435577</Receipt>\
<SettlementDate>22-Dec-2024</SettlementDate>\
<DeclinedCode></DeclinedCode>\
<DeclinedMessage></DeclinedMessage>\
</Response>";

const DECLINED: &str = "<Response>\
<ResponseCode>1</ResponseCode>\
<Timestamp>20-Dec-2024 04:14:56</Timestamp>\
<Receipt>89435578</Receipt>\
<SettlementDate>22-Dec-2024</SettlementDate>\
<DeclinedCode>05</DeclinedCode>\
<DeclinedMessage>Do Not Honour</DeclinedMessage>\
</Response>";

const SOAP_FAULT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:xsd="http://www.w3.org/2001/XMLSchema">
  <soap:Body>
    <soap:Fault>
      <faultcode>soap:Client</faultcode>
      <faultstring>Server was unable to read request.</faultstring>
    </soap:Fault>
  </soap:Body>
</soap:Envelope>"#;

fn card() -> Card {
    Card {
        number: CardNumber::from_str("4005550000000019").unwrap(),
        expiration: CardExpiration::new(9, 2035).unwrap(),
        cvc: Some(Secret::new("123".to_string())),
        first_name: Some(Secret::new("Longbob".to_string())),
        last_name: Some(Secret::new("Longsen".to_string())),
    }
}

fn options() -> PaymentOptions {
    PaymentOptions {
        order_id: Some("1".to_string()),
        ..Default::default()
    }
}

fn gateway(transport: Arc<MockTransport>) -> ConnectorGateway {
    let connectors = Connectors {
        bamboraapac: ConnectorParams::new(
            "https://demo.ippayments.com.au/interface/api/",
            Some("https://www.ippayments.com.au/interface/api/".to_string()),
        ),
        ..Default::default()
    };
    ConnectorGateway::new(
        ConnectorData::get_connector_by_name(&ConnectorEnum::Bamboraapac),
        ConnectorAuthType::SignatureKey {
            api_key: Secret::new("nmi.api".to_string()),
            key1: Secret::new("qwerty".to_string()),
            api_secret: Secret::new("123456".to_string()),
        },
        connectors,
        GatewayMode::Test,
        transport,
    )
}

#[tokio::test]
async fn successful_purchase() {
    let transport = MockTransport::new(vec![MockTransport::ok(&dts_response(
        "SubmitSinglePayment",
        APPROVED,
    ))]);
    let response = gateway(transport.clone())
        .purchase(MinorUnit::new(100), &card().into(), &options())
        .await
        .unwrap();

    assert!(response.is_success());
    assert!(response.is_test());
    assert_eq!(response.message(), "Succeeded");
    assert_eq!(response.authorization().unwrap().to_string(), "89435577");
    assert_eq!(response.param("SettlementDate"), Some("22-Dec-2024"));

    let request = transport.last_request();
    assert_eq!(
        request.url,
        "https://demo.ippayments.com.au/interface/api/dts.asmx"
    );
    assert_eq!(
        request.headers.get("Content-Type").map(String::as_str),
        Some("text/xml")
    );
    assert_eq!(
        request.headers.get("SOAPAction").map(String::as_str),
        Some("http://www.ippayments.com.au/interface/api/dts/SubmitSinglePayment")
    );

    let body = request.body.unwrap();
    assert!(body.contains("<dts:SubmitSinglePayment>"));
    assert!(body.contains("<dts:trnXML><![CDATA[<Transaction>"));
    assert!(body.contains("<CustRef>1</CustRef>"));
    assert!(body.contains("<Amount>100</Amount>"));
    assert!(body.contains("<TrnType>1</TrnType>"));
    assert!(body.contains("<AccountNumber>123456</AccountNumber>"));
    assert!(body.contains(r#"<CreditCard Registered="False">"#));
    assert!(body.contains("<CardNumber>4005550000000019</CardNumber>"));
    assert!(body.contains("<ExpM>09</ExpM><ExpY>2035</ExpY><CVN>123</CVN>"));
    assert!(body.contains("<CardHolderName>Longbob Longsen</CardHolderName>"));
    assert!(body.contains("<Security><UserName>nmi.api</UserName><Password>qwerty</Password></Security>"));
}

#[tokio::test]
async fn declined_purchase() {
    let transport = MockTransport::new(vec![MockTransport::ok(&dts_response(
        "SubmitSinglePayment",
        DECLINED,
    ))]);
    let response = gateway(transport)
        .purchase(MinorUnit::new(105), &card().into(), &options())
        .await
        .unwrap();

    assert!(!response.is_success());
    assert_eq!(response.message(), "Do Not Honour");
    assert_eq!(response.error_code(), Some(StandardErrorCode::CardDeclined));
    assert_eq!(response.param("DeclinedCode"), Some("05"));
}

#[tokio::test]
async fn authorize_and_capture() {
    let transport = MockTransport::new(vec![
        MockTransport::ok(&dts_response("SubmitSinglePayment", APPROVED)),
        MockTransport::ok(&dts_response("SubmitSingleCapture", APPROVED)),
    ]);
    let gateway = gateway(transport.clone());

    let auth = gateway
        .authorize(MinorUnit::new(100), &card().into(), &options())
        .await
        .unwrap();
    assert!(auth.is_success());
    assert!(transport
        .last_request()
        .body
        .unwrap()
        .contains("<TrnType>2</TrnType>"));

    let capture = gateway
        .capture(
            MinorUnit::new(100),
            auth.authorization().unwrap(),
            &PaymentOptions::default(),
        )
        .await
        .unwrap();
    assert!(capture.is_success());

    let body = transport.last_request().body.unwrap();
    assert!(body.contains("<dts:SubmitSingleCapture>"));
    assert!(body.contains("<Capture><Receipt>89435577</Receipt><Amount>100</Amount>"));
}

#[tokio::test]
async fn refund_and_void() {
    let transport = MockTransport::new(vec![
        MockTransport::ok(&dts_response("SubmitSingleRefund", APPROVED)),
        MockTransport::ok(&dts_response("SubmitSingleVoid", APPROVED)),
    ]);
    let gateway = gateway(transport.clone());
    let authorization = AuthorizationToken::single("89435577");

    let refund = gateway
        .refund(MinorUnit::new(50), &authorization, &options())
        .await
        .unwrap();
    assert!(refund.is_success());
    let body = transport.last_request().body.unwrap();
    assert!(body.contains("<dts:SubmitSingleRefund>"));
    assert!(body.contains("<Refund><CustRef>1</CustRef><Receipt>89435577</Receipt><Amount>50</Amount>"));

    let void = gateway
        .void(
            &authorization,
            &PaymentOptions {
                amount: Some(MinorUnit::new(100)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(void.is_success());
    let body = transport.last_request().body.unwrap();
    assert!(body.contains("<dts:SubmitSingleVoid>"));
    assert!(body.contains("<Void><Receipt>89435577</Receipt><Amount>100</Amount>"));
}

#[tokio::test]
async fn purchase_with_stored_token() {
    let transport = MockTransport::new(vec![MockTransport::ok(&dts_response(
        "SubmitSinglePayment",
        APPROVED,
    ))]);
    let token = PaymentMethodData::Token(Secret::new("5276373598391029".to_string()));
    let response = gateway(transport.clone())
        .purchase(MinorUnit::new(100), &token, &options())
        .await
        .unwrap();

    assert!(response.is_success());
    let body = transport.last_request().body.unwrap();
    assert!(body.contains(r#"<CreditCard Registered="True"><CardNumber>5276373598391029</CardNumber></CreditCard>"#));
}

#[tokio::test]
async fn store_tokenises_the_card() {
    let tokenised = "<TokeniseCreditCardResponse>\
<ReturnValue>0</ReturnValue>\
<Token>5276373598391029</Token>\
</TokeniseCreditCardResponse>"
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    let body = format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>
    <TokeniseCreditCardResponse xmlns="http://www.ippayments.com.au/interface/api/sipp">
      <TokeniseCreditCardResult>{tokenised}</TokeniseCreditCardResult>
    </TokeniseCreditCardResponse>
  </soap:Body>
</soap:Envelope>"#
    );
    let transport = MockTransport::new(vec![MockTransport::ok(&body)]);
    let response = gateway(transport.clone())
        .store(
            &card().into(),
            &PaymentOptions {
                customer: Some("123".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(response.is_success());
    assert_eq!(response.authorization().unwrap().to_string(), "5276373598391029");

    let request = transport.last_request();
    assert_eq!(
        request.url,
        "https://demo.ippayments.com.au/interface/api/sipp.asmx"
    );
    let body = request.body.unwrap();
    assert!(body.contains("<sipp:TokeniseCreditCard>"));
    assert!(body.contains("<CustomerStorageNumber>123</CustomerStorageNumber>"));
    assert!(body.contains("<TokeniseAlgorithmID>2</TokeniseAlgorithmID>"));
}

#[tokio::test]
async fn unstore_is_not_supported() {
    let transport = MockTransport::new(vec![]);
    let error = gateway(transport.clone())
        .unstore(
            &AuthorizationToken::single("5276373598391029"),
            &PaymentOptions::default(),
        )
        .await
        .unwrap_err();

    assert_eq!(
        error.current_context(),
        &ConnectorError::FlowNotSupported {
            flow: "unstore".to_string(),
            connector: "bamboraapac".to_string(),
        }
    );
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn verify_authorizes_then_voids() {
    let transport = MockTransport::new(vec![
        MockTransport::ok(&dts_response("SubmitSinglePayment", APPROVED)),
        MockTransport::ok(&dts_response("SubmitSingleVoid", APPROVED)),
    ]);
    let response = gateway(transport.clone())
        .verify(&card().into(), &options())
        .await
        .unwrap();

    assert!(response.is_success());
    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[1]
        .body
        .as_deref()
        .unwrap()
        .contains("<Void><Receipt>89435577</Receipt><Amount>100</Amount>"));
}

#[tokio::test]
async fn soap_fault_is_a_failed_response() {
    let transport = MockTransport::new(vec![MockTransport::http_error(500, SOAP_FAULT)]);
    let response = gateway(transport)
        .purchase(MinorUnit::new(100), &card().into(), &options())
        .await
        .unwrap();

    assert!(!response.is_success());
    assert_eq!(response.message(), "Server was unable to read request.");
    assert_eq!(response.error_code(), Some(StandardErrorCode::ConfigError));
}

#[tokio::test]
async fn unparsable_body_is_a_failed_response() {
    let transport = MockTransport::new(vec![MockTransport::ok("<html>Service Unavailable</html>")]);
    let response = gateway(transport)
        .purchase(MinorUnit::new(100), &card().into(), &options())
        .await
        .unwrap();

    assert!(!response.is_success());
    assert_eq!(response.message(), consts::UNPARSABLE_RESPONSE_MESSAGE);
    assert_eq!(response.error_code(), Some(StandardErrorCode::UnparsableResponse));
}

#[test]
fn namespaces_are_stripped() {
    let stripped = strip_soap_namespaces(
        r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body/></soap:Envelope>"#,
    );
    assert_eq!(stripped, "<Envelope><Body/></Envelope>");
}
