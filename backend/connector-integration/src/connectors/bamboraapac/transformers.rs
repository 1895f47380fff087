use common_enums::StandardErrorCode;
use common_utils::{
    ext_traits::XmlExt,
    types::{MinorUnit, MinorUnitForConnector},
};
use domain_types::{
    connector_flow::{Authorize, Capture, Purchase, Refund, Store, Void},
    connector_types::{
        PaymentMethodStoreData, PaymentVoidData, PaymentsAuthorizeData, PaymentsCaptureData,
        RefundsData,
    },
    errors::ConnectorError,
    gateway_response::{AuthorizationToken, GatewayResponse, GatewayResponseBuilder},
    payment_method_data::PaymentMethodData,
    router_data::{ConnectorAuthType, RouterData},
    utils::convert_amount,
};
use error_stack::ResultExt;
use hyperswitch_masking::{PeekInterface, Secret};
use serde::{Deserialize, Serialize};

use crate::{
    connectors::macros::GetSoapXml,
    types::ResponseRouterData,
    utils::{
        decode_html_entities, empty_string_as_none, response_params,
        serialize_to_xml_string_with_root,
    },
};

type Error = error_stack::Report<ConnectorError>;

const CONNECTOR: &str = "bamboraapac";
const DTS_NAMESPACE: &str = "http://www.ippayments.com.au/interface/api/dts";
const SIPP_NAMESPACE: &str = "http://www.ippayments.com.au/interface/api/sipp";

// Authentication Type Definition
#[derive(Debug, Clone)]
pub struct BamboraapacAuthType {
    pub username: Secret<String>,
    pub password: Secret<String>,
    pub account_number: Option<Secret<String>>,
}

impl TryFrom<&ConnectorAuthType> for BamboraapacAuthType {
    type Error = Error;

    fn try_from(auth_type: &ConnectorAuthType) -> Result<Self, Self::Error> {
        match auth_type {
            ConnectorAuthType::BodyKey { api_key, key1 } => Ok(Self {
                username: api_key.clone(),
                password: key1.clone(),
                account_number: None,
            }),
            ConnectorAuthType::SignatureKey {
                api_key,
                key1,
                api_secret,
            } => Ok(Self {
                username: api_key.clone(),
                password: key1.clone(),
                account_number: Some(api_secret.clone()),
            }),
            _ => Err(ConnectorError::FailedToObtainAuthType.into()),
        }
    }
}

#[derive(Debug, Serialize)]
struct SecurityXml {
    #[serde(rename = "UserName")]
    username: Secret<String>,
    #[serde(rename = "Password")]
    password: Secret<String>,
}

impl From<&BamboraapacAuthType> for SecurityXml {
    fn from(auth: &BamboraapacAuthType) -> Self {
        Self {
            username: auth.username.clone(),
            password: auth.password.clone(),
        }
    }
}

// Transaction Types for Bambora APAC
#[derive(Debug, Clone, Copy)]
pub enum BamboraapacTrnType {
    Purchase = 1,
    PreAuth = 2,
}

impl Serialize for BamboraapacTrnType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

pub(super) fn dts_action(operation: &str) -> String {
    format!("{DTS_NAMESPACE}/{operation}")
}

pub(super) fn sipp_action(operation: &str) -> String {
    format!("{SIPP_NAMESPACE}/{operation}")
}

/// Wrap `inner` into the SOAP call `operation`, passing it as the CDATA
/// argument `parameter`.
fn soap_envelope(
    prefix: &str,
    namespace: &str,
    operation: &str,
    parameter: &str,
    inner: &str,
) -> String {
    format!(
        r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns:{prefix}="{namespace}">
<soapenv:Body>
<{prefix}:{operation}>
<{prefix}:{parameter}><![CDATA[{inner}]]></{prefix}:{parameter}>
</{prefix}:{operation}>
</soapenv:Body>
</soapenv:Envelope>"#
    )
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Serialize)]
struct CreditCardXml {
    // "True" when CardNumber holds a stored token
    #[serde(rename = "@Registered")]
    registered: &'static str,
    #[serde(rename = "CardNumber")]
    card_number: Secret<String>,
    #[serde(rename = "ExpM", skip_serializing_if = "Option::is_none")]
    exp_month: Option<Secret<String>>,
    #[serde(rename = "ExpY", skip_serializing_if = "Option::is_none")]
    exp_year: Option<Secret<String>>,
    #[serde(rename = "CVN", skip_serializing_if = "Option::is_none")]
    cvn: Option<Secret<String>>,
    #[serde(rename = "CardHolderName", skip_serializing_if = "Option::is_none")]
    card_holder_name: Option<Secret<String>>,
}

impl From<&PaymentMethodData> for CreditCardXml {
    fn from(payment_method: &PaymentMethodData) -> Self {
        match payment_method {
            PaymentMethodData::Card(card) => Self {
                registered: "False",
                card_number: Secret::new(card.number.peek().clone()),
                exp_month: Some(card.get_expiry_month_2_digit()),
                exp_year: Some(card.get_expiry_year_4_digit()),
                cvn: card.cvc.clone(),
                card_holder_name: card.holder_name(),
            },
            PaymentMethodData::Token(token) => Self {
                registered: "True",
                card_number: token.clone(),
                exp_month: None,
                exp_year: None,
                cvn: None,
                card_holder_name: None,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BamboraapacPaymentRequest {
    #[serde(rename = "CustRef", skip_serializing_if = "Option::is_none")]
    cust_ref: Option<String>,
    #[serde(rename = "Amount")]
    amount: MinorUnit,
    #[serde(rename = "TrnType")]
    trn_type: BamboraapacTrnType,
    #[serde(rename = "AccountNumber", skip_serializing_if = "Option::is_none")]
    account_number: Option<Secret<String>>,
    #[serde(rename = "CreditCard")]
    credit_card: CreditCardXml,
    #[serde(rename = "Security")]
    security: SecurityXml,
}

impl BamboraapacPaymentRequest {
    fn new(
        request: &PaymentsAuthorizeData,
        auth_type: &ConnectorAuthType,
        trn_type: BamboraapacTrnType,
    ) -> Result<Self, Error> {
        let auth = BamboraapacAuthType::try_from(auth_type)?;
        Ok(Self {
            cust_ref: request.options.order_id.clone(),
            amount: convert_amount(&MinorUnitForConnector, request.amount, request.currency)?,
            trn_type,
            account_number: auth.account_number.clone(),
            credit_card: CreditCardXml::from(&request.payment_method),
            security: SecurityXml::from(&auth),
        })
    }
}

impl TryFrom<&RouterData<Purchase, PaymentsAuthorizeData>> for BamboraapacPaymentRequest {
    type Error = Error;

    fn try_from(item: &RouterData<Purchase, PaymentsAuthorizeData>) -> Result<Self, Self::Error> {
        Self::new(
            &item.request,
            &item.connector_auth_type,
            BamboraapacTrnType::Purchase,
        )
    }
}

impl TryFrom<&RouterData<Authorize, PaymentsAuthorizeData>> for BamboraapacPaymentRequest {
    type Error = Error;

    fn try_from(item: &RouterData<Authorize, PaymentsAuthorizeData>) -> Result<Self, Self::Error> {
        Self::new(
            &item.request,
            &item.connector_auth_type,
            BamboraapacTrnType::PreAuth,
        )
    }
}

impl GetSoapXml for BamboraapacPaymentRequest {
    fn to_soap_xml(&self) -> Result<String, Error> {
        let transaction_xml = serialize_to_xml_string_with_root("Transaction", self)?;
        Ok(soap_envelope(
            "dts",
            DTS_NAMESPACE,
            "SubmitSinglePayment",
            "trnXML",
            &transaction_xml,
        ))
    }
}

/// Capture and void both act on the receipt of an earlier pre-auth.
#[derive(Debug, Serialize)]
pub struct BamboraapacReceiptRequest {
    #[serde(rename = "Receipt")]
    receipt: String,
    #[serde(rename = "Amount")]
    amount: MinorUnit,
    #[serde(rename = "Security")]
    security: SecurityXml,
    #[serde(skip)]
    operation: &'static str,
    #[serde(skip)]
    root: &'static str,
}

pub type BamboraapacCaptureRequest = BamboraapacReceiptRequest;
pub type BamboraapacVoidRequest = BamboraapacReceiptRequest;

fn receipt(authorization: &AuthorizationToken) -> Result<String, Error> {
    authorization
        .primary()
        .filter(|receipt| !receipt.trim().is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            ConnectorError::InvalidAuthorization {
                authorization: authorization.to_string(),
                connector: CONNECTOR,
            }
            .into()
        })
}

impl TryFrom<&RouterData<Capture, PaymentsCaptureData>> for BamboraapacReceiptRequest {
    type Error = Error;

    fn try_from(item: &RouterData<Capture, PaymentsCaptureData>) -> Result<Self, Self::Error> {
        let auth = BamboraapacAuthType::try_from(&item.connector_auth_type)?;
        Ok(Self {
            receipt: receipt(&item.request.authorization)?,
            amount: convert_amount(
                &MinorUnitForConnector,
                item.request.amount,
                item.request.currency,
            )?,
            security: SecurityXml::from(&auth),
            operation: "SubmitSingleCapture",
            root: "Capture",
        })
    }
}

impl TryFrom<&RouterData<Void, PaymentVoidData>> for BamboraapacReceiptRequest {
    type Error = Error;

    fn try_from(item: &RouterData<Void, PaymentVoidData>) -> Result<Self, Self::Error> {
        let auth = BamboraapacAuthType::try_from(&item.connector_auth_type)?;
        let options = &item.request.options;
        Ok(Self {
            receipt: receipt(&item.request.authorization)?,
            amount: convert_amount(
                &MinorUnitForConnector,
                options.get_amount()?,
                options.currency_or(common_enums::Currency::AUD),
            )?,
            security: SecurityXml::from(&auth),
            operation: "SubmitSingleVoid",
            root: "Void",
        })
    }
}

impl GetSoapXml for BamboraapacReceiptRequest {
    fn to_soap_xml(&self) -> Result<String, Error> {
        let inner_xml = serialize_to_xml_string_with_root(self.root, self)?;
        Ok(soap_envelope(
            "dts",
            DTS_NAMESPACE,
            self.operation,
            "trnXML",
            &inner_xml,
        ))
    }
}

#[derive(Debug, Serialize)]
pub struct BamboraapacRefundRequest {
    #[serde(rename = "CustRef", skip_serializing_if = "Option::is_none")]
    cust_ref: Option<String>,
    #[serde(rename = "Receipt")]
    receipt: String,
    #[serde(rename = "Amount")]
    amount: MinorUnit,
    #[serde(rename = "Security")]
    security: SecurityXml,
}

impl TryFrom<&RouterData<Refund, RefundsData>> for BamboraapacRefundRequest {
    type Error = Error;

    fn try_from(item: &RouterData<Refund, RefundsData>) -> Result<Self, Self::Error> {
        let auth = BamboraapacAuthType::try_from(&item.connector_auth_type)?;
        Ok(Self {
            cust_ref: item.request.options.order_id.clone(),
            receipt: receipt(&item.request.authorization)?,
            amount: convert_amount(
                &MinorUnitForConnector,
                item.request.amount,
                item.request.currency,
            )?,
            security: SecurityXml::from(&auth),
        })
    }
}

impl GetSoapXml for BamboraapacRefundRequest {
    fn to_soap_xml(&self) -> Result<String, Error> {
        let refund_xml = serialize_to_xml_string_with_root("Refund", self)?;
        Ok(soap_envelope(
            "dts",
            DTS_NAMESPACE,
            "SubmitSingleRefund",
            "trnXML",
            &refund_xml,
        ))
    }
}

#[derive(Debug, Serialize)]
pub struct BamboraapacTokeniseRequest {
    #[serde(rename = "CustomerStorageNumber", skip_serializing_if = "Option::is_none")]
    customer_storage_number: Option<String>,
    #[serde(rename = "CardNumber")]
    card_number: Secret<String>,
    #[serde(rename = "ExpM")]
    exp_month: Secret<String>,
    #[serde(rename = "ExpY")]
    exp_year: Secret<String>,
    #[serde(rename = "CardHolderName", skip_serializing_if = "Option::is_none")]
    card_holder_name: Option<Secret<String>>,
    #[serde(rename = "TokeniseAlgorithmID")]
    tokenise_algorithm_id: u8,
    #[serde(rename = "UserName")]
    username: Secret<String>,
    #[serde(rename = "Password")]
    password: Secret<String>,
}

impl TryFrom<&RouterData<Store, PaymentMethodStoreData>> for BamboraapacTokeniseRequest {
    type Error = Error;

    fn try_from(item: &RouterData<Store, PaymentMethodStoreData>) -> Result<Self, Self::Error> {
        let auth = BamboraapacAuthType::try_from(&item.connector_auth_type)?;
        let card = item.request.get_card()?;
        let options = &item.request.options;
        Ok(Self {
            customer_storage_number: options.customer.clone().or(options.order_id.clone()),
            card_number: Secret::new(card.number.peek().clone()),
            exp_month: card.get_expiry_month_2_digit(),
            exp_year: card.get_expiry_year_4_digit(),
            card_holder_name: card.holder_name(),
            tokenise_algorithm_id: 2,
            username: auth.username,
            password: auth.password,
        })
    }
}

impl GetSoapXml for BamboraapacTokeniseRequest {
    fn to_soap_xml(&self) -> Result<String, Error> {
        let tokenise_xml = serialize_to_xml_string_with_root("TokeniseCreditCard", self)?;
        Ok(soap_envelope(
            "sipp",
            SIPP_NAMESPACE,
            "TokeniseCreditCard",
            "tokeniseCreditCardXML",
            &tokenise_xml,
        ))
    }
}

// ============================================================================
// Response Types
// ============================================================================

// Namespace prefixes are stripped before parsing; the Envelope wrapper is
// skipped by the XML deserializer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SoapBody {
    pub body: SoapOperationResponse,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SoapOperationResponse {
    #[serde(
        alias = "SubmitSinglePaymentResponse",
        alias = "SubmitSingleCaptureResponse",
        alias = "SubmitSingleRefundResponse",
        alias = "SubmitSingleVoidResponse",
        alias = "TokeniseCreditCardResponse"
    )]
    pub operation: SoapResult,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SoapResult {
    // HTML-encoded XML document
    #[serde(
        alias = "SubmitSinglePaymentResult",
        alias = "SubmitSingleCaptureResult",
        alias = "SubmitSingleRefundResult",
        alias = "SubmitSingleVoidResult",
        alias = "TokeniseCreditCardResult"
    )]
    pub result: String,
}

impl SoapBody {
    fn parse_result<T: serde::de::DeserializeOwned>(
        &self,
        type_name: &'static str,
    ) -> Result<T, Error> {
        let result = self.body.operation.result.trim();
        // the deserializer already unescaped the outer layer when the result
        // was sent entity-encoded rather than as CDATA
        let inner_xml = if result.starts_with('<') {
            result.to_string()
        } else {
            decode_html_entities(result)
        };
        inner_xml
            .as_str()
            .parse_xml(type_name)
            .change_context(ConnectorError::ResponseDeserializationFailed)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct BamboraapacTransactionResponse(pub SoapBody);

pub type BamboraapacPurchaseResponse = BamboraapacTransactionResponse;
pub type BamboraapacAuthorizeResponse = BamboraapacTransactionResponse;
pub type BamboraapacCaptureResponse = BamboraapacTransactionResponse;
pub type BamboraapacRefundResponse = BamboraapacTransactionResponse;
pub type BamboraapacVoidResponse = BamboraapacTransactionResponse;

// Inner response structure (after decoding HTML entities)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactionResult {
    pub response_code: u8,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub receipt: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub settlement_date: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub credit_card_token: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub declined_code: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub declined_message: Option<String>,
}

/// ISO 8583 response codes as reported in `DeclinedCode`.
fn declined_error_code(code: Option<&str>) -> StandardErrorCode {
    match code {
        Some("01") | Some("02") => StandardErrorCode::CallIssuer,
        Some("04") | Some("07") | Some("41") | Some("43") => StandardErrorCode::PickupCard,
        Some("14") | Some("15") => StandardErrorCode::InvalidNumber,
        Some("33") | Some("54") => StandardErrorCode::ExpiredCard,
        Some("82") | Some("N7") => StandardErrorCode::IncorrectCvc,
        Some("96") => StandardErrorCode::ProcessingError,
        _ => StandardErrorCode::CardDeclined,
    }
}

impl<F, Req> TryFrom<ResponseRouterData<BamboraapacTransactionResponse, &RouterData<F, Req>>>
    for GatewayResponseBuilder
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<BamboraapacTransactionResponse, &RouterData<F, Req>>,
    ) -> Result<Self, Self::Error> {
        let response: TransactionResult = item.response.0.parse_result("TransactionResult")?;
        let params = response_params(&response)?;

        // 0 = Approved, 1 = Not Approved
        if response.response_code == 0 {
            return Ok(GatewayResponse::builder(true, "Succeeded")
                .params(params)
                .authorization(response.receipt.map(AuthorizationToken::single)));
        }

        let message = response
            .declined_message
            .clone()
            .unwrap_or_else(|| "Payment declined".to_string());
        Ok(GatewayResponse::failure(
            message,
            declined_error_code(response.declined_code.as_deref()),
        )
        .params(params)
        .authorization(response.receipt.map(AuthorizationToken::single)))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct BamboraapacTokeniseResponse(pub SoapBody);

pub type BamboraapacStoreResponse = BamboraapacTokeniseResponse;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TokeniseResult {
    pub return_value: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub token: Option<String>,
}

impl<F, Req> TryFrom<ResponseRouterData<BamboraapacTokeniseResponse, &RouterData<F, Req>>>
    for GatewayResponseBuilder
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<BamboraapacTokeniseResponse, &RouterData<F, Req>>,
    ) -> Result<Self, Self::Error> {
        let response: TokeniseResult = item.response.0.parse_result("TokeniseResult")?;
        let success = response.return_value.trim() == "0";
        let builder = if success {
            GatewayResponse::builder(true, "Succeeded")
        } else {
            GatewayResponse::failure(
                format!("Tokenisation failed with return value {}", response.return_value),
                StandardErrorCode::ProcessingError,
            )
        };
        Ok(builder
            .params(response_params(&response)?)
            .authorization(response.token.map(AuthorizationToken::single)))
    }
}

// Error Response Structure
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BamboraapacFaultEnvelope {
    pub body: BamboraapacFaultBody,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BamboraapacFaultBody {
    pub fault: BamboraapacFault,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BamboraapacFault {
    #[serde(rename = "faultcode")]
    pub fault_code: String,
    #[serde(rename = "faultstring")]
    pub fault_string: String,
}
