use std::collections::BTreeMap;

use common_enums::StandardErrorCode;
use common_utils::{
    pii::IpAddress,
    types::{FloatMajorUnit, FloatMajorUnitForConnector},
};
use domain_types::{
    card_verification::{AvsResult, CvvResult},
    connector_flow::{Authorize, Capture, Purchase, Refund, Store, Void},
    connector_types::{
        PaymentMethodStoreData, PaymentOptions, PaymentVoidData, PaymentsAuthorizeData,
        PaymentsCaptureData, RefundsData,
    },
    errors,
    gateway_response::{AuthorizationToken, GatewayResponse, GatewayResponseBuilder},
    payment_address::{add_address, AddressFieldNames},
    payment_method_data::{Card, PaymentMethodData},
    router_data::{ConnectorAuthType, RouterData},
    utils::convert_amount,
};
use hyperswitch_masking::{PeekInterface, Secret};
use serde::{Deserialize, Serialize};

use crate::{
    types::ResponseRouterData,
    utils::{empty_string_as_none, optional_str_or_i32, response_params, str_or_i32},
};

type Error = error_stack::Report<errors::ConnectorError>;

const CONNECTOR: &str = "bambora";

// ============================================================================
// Authentication Types
// ============================================================================

#[derive(Debug, Clone)]
pub struct BamboraAuthType {
    pub(super) passcode: Secret<String>,
}

impl BamboraAuthType {
    /// Format: "Passcode base64(merchant_id:api_key)"
    pub fn generate_authorization_header(&self) -> Secret<String> {
        Secret::new(format!("Passcode {}", self.passcode.peek()))
    }
}

impl TryFrom<&ConnectorAuthType> for BamboraAuthType {
    type Error = Error;

    fn try_from(auth_type: &ConnectorAuthType) -> Result<Self, Self::Error> {
        match auth_type {
            // key1 holds the merchant id
            ConnectorAuthType::BodyKey { api_key, key1 } => {
                let auth_string = format!("{}:{}", key1.peek(), api_key.peek());
                let encoded = base64::Engine::encode(
                    &base64::engine::general_purpose::STANDARD,
                    auth_string.as_bytes(),
                );
                Ok(Self {
                    passcode: Secret::new(encoded),
                })
            }
            _ => Err(error_stack::report!(
                errors::ConnectorError::FailedToObtainAuthType
            )),
        }
    }
}

/// The two halves of a Bambora authorization: the transaction id used in
/// follow-up URLs and the issuer's approval code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BamboraAuthorization {
    pub transaction_id: String,
    pub auth_code: Option<String>,
}

impl TryFrom<&AuthorizationToken> for BamboraAuthorization {
    type Error = Error;

    fn try_from(token: &AuthorizationToken) -> Result<Self, Self::Error> {
        let transaction_id = token
            .primary()
            .filter(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric()))
            .ok_or_else(|| errors::ConnectorError::InvalidAuthorization {
                authorization: token.to_string(),
                connector: CONNECTOR,
            })?;
        Ok(Self {
            transaction_id: transaction_id.to_string(),
            auth_code: token
                .part(1)
                .filter(|code| !code.is_empty())
                .map(str::to_string),
        })
    }
}

impl From<&BamboraAuthorization> for AuthorizationToken {
    fn from(authorization: &BamboraAuthorization) -> Self {
        Self::new([
            authorization.transaction_id.as_str(),
            authorization.auth_code.as_deref().unwrap_or_default(),
        ])
    }
}

// ============================================================================
// Error Response Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BamboraErrorResponse {
    pub code: i32,
    pub category: i32,
    pub message: String,
    #[serde(default)]
    pub reference: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<BamboraErrorDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BamboraErrorDetail {
    pub field: String,
    pub message: String,
}

impl BamboraErrorResponse {
    /// Category 1 is the issuer declining, 2 a rejected request and 3 a
    /// merchant configuration problem.
    pub fn standard_error_code(&self, status_code: u16) -> StandardErrorCode {
        match (status_code, self.category) {
            (401, _) => StandardErrorCode::AuthenticationFailure,
            (_, 1) => StandardErrorCode::CardDeclined,
            (_, 3) => StandardErrorCode::ConfigError,
            _ => self
                .details
                .iter()
                .find_map(|detail| field_error_code(&detail.field))
                .unwrap_or(StandardErrorCode::ProcessingError),
        }
    }
}

fn field_error_code(field: &str) -> Option<StandardErrorCode> {
    match field {
        "card.number" => Some(StandardErrorCode::InvalidNumber),
        "card.expiry_month" | "card.expiry_year" => Some(StandardErrorCode::InvalidExpiryDate),
        "card.cvd" => Some(StandardErrorCode::InvalidCvc),
        "amount" => Some(StandardErrorCode::InvalidAmount),
        _ => None,
    }
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodType {
    Card,
    PaymentProfile,
}

#[derive(Debug, Serialize)]
pub struct BamboraPaymentsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    pub amount: FloatMajorUnit,
    pub payment_method: PaymentMethodType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<BamboraCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_profile: Option<BamboraPaymentProfile>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub billing: BTreeMap<String, Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_ip: Option<Secret<String, IpAddress>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BamboraCard {
    pub name: Secret<String>,
    pub number: cards::CardNumber,
    pub expiry_month: Secret<String>,
    pub expiry_year: Secret<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cvd: Option<Secret<String>>,
    // false leaves the payment as a pre-authorization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complete: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct BamboraPaymentProfile {
    pub customer_code: Secret<String>,
    pub card_id: u8,
    pub complete: bool,
}

/// Body of completions, returns and void.
#[derive(Debug, Serialize)]
pub struct BamboraAmountRequest {
    pub amount: FloatMajorUnit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
}

pub type BamboraCaptureRequest = BamboraAmountRequest;
pub type BamboraRefundRequest = BamboraAmountRequest;
pub type BamboraVoidRequest = BamboraAmountRequest;

#[derive(Debug, Serialize)]
pub struct BamboraProfileRequest {
    pub card: BamboraCard,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub billing: BTreeMap<String, Secret<String>>,
}

const BILLING_FIELDS: AddressFieldNames = AddressFieldNames {
    name: Some("name"),
    company: None,
    address1: Some("address_line1"),
    address2: Some("address_line2"),
    city: Some("city"),
    state: Some("province"),
    zip: Some("postal_code"),
    country: Some("country"),
    phone: Some("phone_number"),
    state_placeholder: "--",
};

fn billing_fields(options: &PaymentOptions) -> BTreeMap<String, Secret<String>> {
    let mut billing = BTreeMap::new();
    add_address(
        &mut billing,
        options.billing_or_shipping_address(),
        &BILLING_FIELDS,
    );
    if let Some(email) = &options.email {
        billing.insert(
            "email_address".to_string(),
            Secret::new(email.peek().clone()),
        );
    }
    billing
}

fn card_holder_name(card: &Card, options: &PaymentOptions) -> Result<Secret<String>, Error> {
    card.holder_name()
        .or_else(|| {
            options
                .billing_or_shipping_address()
                .and_then(|address| address.name.clone())
                .filter(|name| !name.peek().trim().is_empty())
        })
        .ok_or_else(|| {
            errors::ConnectorError::MissingRequiredField {
                field_name: "card.name",
            }
            .into()
        })
}

fn bambora_card(
    card: &Card,
    options: &PaymentOptions,
    complete: Option<bool>,
) -> Result<BamboraCard, Error> {
    Ok(BamboraCard {
        name: card_holder_name(card, options)?,
        number: card.number.clone(),
        expiry_month: card.get_expiry_month_2_digit(),
        expiry_year: card.get_expiry_year_2_digit(),
        cvd: card.cvc.clone(),
        complete,
    })
}

fn payments_request(
    request: &PaymentsAuthorizeData,
    complete: bool,
) -> Result<BamboraPaymentsRequest, Error> {
    let amount = convert_amount(&FloatMajorUnitForConnector, request.amount, request.currency)?;
    let options = &request.options;

    let (payment_method, card, payment_profile) = match &request.payment_method {
        PaymentMethodData::Card(card) => (
            PaymentMethodType::Card,
            Some(bambora_card(card, options, Some(complete))?),
            None,
        ),
        PaymentMethodData::Token(customer_code) => (
            PaymentMethodType::PaymentProfile,
            None,
            Some(BamboraPaymentProfile {
                customer_code: customer_code.clone(),
                card_id: 1,
                complete,
            }),
        ),
    };

    Ok(BamboraPaymentsRequest {
        order_number: options.order_id.clone(),
        amount,
        payment_method,
        card,
        payment_profile,
        billing: billing_fields(options),
        customer_ip: options.ip.clone(),
        comments: options.description.clone(),
    })
}

impl TryFrom<&RouterData<Purchase, PaymentsAuthorizeData>> for BamboraPaymentsRequest {
    type Error = Error;

    fn try_from(item: &RouterData<Purchase, PaymentsAuthorizeData>) -> Result<Self, Self::Error> {
        payments_request(&item.request, true)
    }
}

impl TryFrom<&RouterData<Authorize, PaymentsAuthorizeData>> for BamboraPaymentsRequest {
    type Error = Error;

    fn try_from(item: &RouterData<Authorize, PaymentsAuthorizeData>) -> Result<Self, Self::Error> {
        payments_request(&item.request, false)
    }
}

impl TryFrom<&RouterData<Capture, PaymentsCaptureData>> for BamboraAmountRequest {
    type Error = Error;

    fn try_from(item: &RouterData<Capture, PaymentsCaptureData>) -> Result<Self, Self::Error> {
        Ok(Self {
            amount: convert_amount(
                &FloatMajorUnitForConnector,
                item.request.amount,
                item.request.currency,
            )?,
            order_number: item.request.options.order_id.clone(),
        })
    }
}

impl TryFrom<&RouterData<Refund, RefundsData>> for BamboraAmountRequest {
    type Error = Error;

    fn try_from(item: &RouterData<Refund, RefundsData>) -> Result<Self, Self::Error> {
        Ok(Self {
            amount: convert_amount(
                &FloatMajorUnitForConnector,
                item.request.amount,
                item.request.currency,
            )?,
            order_number: item.request.options.order_id.clone(),
        })
    }
}

impl TryFrom<&RouterData<Void, PaymentVoidData>> for BamboraAmountRequest {
    type Error = Error;

    // the void endpoint wants the amount of the payment being voided
    fn try_from(item: &RouterData<Void, PaymentVoidData>) -> Result<Self, Self::Error> {
        let options = &item.request.options;
        Ok(Self {
            amount: convert_amount(
                &FloatMajorUnitForConnector,
                options.get_amount()?,
                options.currency_or(common_enums::Currency::CAD),
            )?,
            order_number: None,
        })
    }
}

impl TryFrom<&RouterData<Store, PaymentMethodStoreData>> for BamboraProfileRequest {
    type Error = Error;

    fn try_from(item: &RouterData<Store, PaymentMethodStoreData>) -> Result<Self, Self::Error> {
        let card = item.request.get_card()?;
        Ok(Self {
            card: bambora_card(card, &item.request.options, None)?,
            billing: billing_fields(&item.request.options),
        })
    }
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Deserialize, Serialize)]
pub struct BamboraPaymentsResponse {
    #[serde(deserialize_with = "str_or_i32")]
    pub id: String,
    #[serde(deserialize_with = "str_or_i32")]
    pub approved: String, // "1" for approved, "0" for declined
    pub message: String,
    #[serde(default, deserialize_with = "optional_str_or_i32")]
    pub message_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub auth_code: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub order_number: Option<String>,
    #[serde(rename = "type", default)]
    pub payment_type: Option<String>, // "P" for payment, "PA" for pre-auth
    #[serde(default)]
    pub amount: Option<FloatMajorUnit>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<BamboraCardResponse>,
}

pub type BamboraPurchaseResponse = BamboraPaymentsResponse;
pub type BamboraAuthorizeResponse = BamboraPaymentsResponse;
pub type BamboraCaptureResponse = BamboraPaymentsResponse;
pub type BamboraRefundResponse = BamboraPaymentsResponse;
pub type BamboraVoidResponse = BamboraPaymentsResponse;

#[derive(Debug, Deserialize, Serialize)]
pub struct BamboraCardResponse {
    #[serde(default)]
    pub card_type: Option<String>,
    #[serde(default)]
    pub last_four: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_match: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_result: Option<i32>,
    #[serde(default, deserialize_with = "optional_str_or_i32")]
    pub cvd_result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avs: Option<BamboraAvsDetails>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct BamboraAvsDetails {
    pub id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub processed: bool,
}

impl BamboraCardResponse {
    fn avs_result(&self) -> AvsResult {
        let match_flag = |flag: Option<i32>| match flag {
            Some(1) => Some("Y"),
            Some(0) => Some("N"),
            _ => None,
        };
        AvsResult::new(self.avs.as_ref().map(|avs| avs.id.as_str()))
            .with_matches(match_flag(self.address_match), match_flag(self.postal_result))
    }

    fn cvv_result(&self) -> CvvResult {
        let code = match self.cvd_result.as_deref() {
            Some("1") => Some("M"),
            Some("2") => Some("N"),
            Some("3") => Some("I"),
            Some("4") => Some("S"),
            Some("5") => Some("U"),
            Some("6") => Some("P"),
            _ => None,
        };
        CvvResult::new(code)
    }
}

impl<F, Req> TryFrom<ResponseRouterData<BamboraPaymentsResponse, &RouterData<F, Req>>>
    for GatewayResponseBuilder
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<BamboraPaymentsResponse, &RouterData<F, Req>>,
    ) -> Result<Self, Self::Error> {
        let response = item.response;
        let success = response.approved == "1";
        let params = response_params(&response)?;
        let authorization = BamboraAuthorization {
            transaction_id: response.id.clone(),
            auth_code: response.auth_code.clone(),
        };

        let builder = GatewayResponse::builder(success, response.message.clone())
            .params(params)
            .authorization(Some(AuthorizationToken::from(&authorization)));
        let builder = match &response.card {
            Some(card) => builder
                .avs_result(card.avs_result())
                .cvv_result(card.cvv_result()),
            None => builder,
        };

        if !success {
            tracing::info!(
                connector = CONNECTOR,
                message_id = response.message_id.as_deref(),
                "payment declined"
            );
        }

        Ok(builder.error_code((!success).then_some(StandardErrorCode::CardDeclined)))
    }
}

/// Payment profile (customer vault) create and delete.
#[derive(Debug, Deserialize, Serialize)]
pub struct BamboraProfileResponse {
    #[serde(deserialize_with = "str_or_i32")]
    pub code: String,
    pub message: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub customer_code: Option<String>,
}

pub type BamboraStoreResponse = BamboraProfileResponse;
pub type BamboraUnstoreResponse = BamboraProfileResponse;

impl<F, Req> TryFrom<ResponseRouterData<BamboraProfileResponse, &RouterData<F, Req>>>
    for GatewayResponseBuilder
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<BamboraProfileResponse, &RouterData<F, Req>>,
    ) -> Result<Self, Self::Error> {
        let response = item.response;
        let success = response.code == "1";
        Ok(GatewayResponse::builder(success, response.message.clone())
            .params(response_params(&response)?)
            .authorization(response.customer_code.clone().map(AuthorizationToken::single))
            .error_code((!success).then_some(StandardErrorCode::ProcessingError)))
    }
}
