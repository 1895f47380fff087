use std::collections::BTreeMap;

use common_enums::{Currency, StandardErrorCode};
use common_utils::{
    pii::{Email, IpAddress},
    types::{StringMajorUnit, StringMajorUnitForConnector},
};
use domain_types::{
    card_verification::{AvsResult, CvvResult},
    connector_flow::{Authorize, Capture, Purchase, Refund, Store, Unstore, Verify, Void},
    connector_types::{
        PaymentMethodStoreData, PaymentMethodUnstoreData, PaymentOptions, PaymentVoidData,
        PaymentsAuthorizeData, PaymentsCaptureData, PaymentsVerifyData, RefundsData,
    },
    errors,
    gateway_response::{AuthorizationToken, GatewayResponse, GatewayResponseBuilder},
    payment_address::{add_address, add_address_with_prefix, AddressFieldNames},
    payment_method_data::{Card, PaymentMethodData},
    router_data::{ConnectorAuthType, RouterData},
    utils::convert_amount,
};
use hyperswitch_masking::{PeekInterface, Secret};
use serde::{Deserialize, Serialize};

use crate::{
    types::ResponseRouterData,
    utils::{empty_string_as_none, response_params},
};

type Error = error_stack::Report<errors::ConnectorError>;

const CONNECTOR: &str = "nmi";

// ===== AUTHENTICATION =====

#[derive(Debug, Clone)]
pub struct NmiAuthType {
    pub security_key: Secret<String>,
}

impl TryFrom<&ConnectorAuthType> for NmiAuthType {
    type Error = Error;

    fn try_from(auth_type: &ConnectorAuthType) -> Result<Self, Self::Error> {
        match auth_type {
            ConnectorAuthType::HeaderKey { api_key }
            | ConnectorAuthType::BodyKey { api_key, .. } => Ok(Self {
                security_key: api_key.to_owned(),
            }),
            _ => Err(error_stack::report!(
                errors::ConnectorError::FailedToObtainAuthType
            )),
        }
    }
}

// ===== TRANSACTION TYPES =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Auth,
    Sale,
    Capture,
    Refund,
    Void,
    Validate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerVaultAction {
    AddCustomer,
    DeleteCustomer,
}

// ===== PAYMENT METHOD DATA =====

#[derive(Debug, Default, Serialize)]
pub struct NmiPaymentMethod {
    #[serde(skip_serializing_if = "Option::is_none")]
    ccnumber: Option<Secret<String>>,
    // MMYY
    #[serde(skip_serializing_if = "Option::is_none")]
    ccexp: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cvv: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_name: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_name: Option<Secret<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    customer_vault_id: Option<Secret<String>>,
}

impl From<&Card> for NmiPaymentMethod {
    fn from(card: &Card) -> Self {
        Self {
            ccnumber: Some(Secret::new(card.number.peek().clone())),
            ccexp: Some(card.get_expiry_date_as_mmyy("")),
            cvv: card.cvc.clone(),
            first_name: card.first_name.clone(),
            last_name: card.last_name.clone(),
            customer_vault_id: None,
        }
    }
}

impl From<&PaymentMethodData> for NmiPaymentMethod {
    fn from(payment_method: &PaymentMethodData) -> Self {
        match payment_method {
            PaymentMethodData::Card(card) => Self::from(card),
            PaymentMethodData::Token(customer_vault_id) => Self {
                customer_vault_id: Some(customer_vault_id.clone()),
                ..Default::default()
            },
        }
    }
}

// ===== ADDRESS AND CUSTOMER DETAILS =====

// names come from the card
const BILLING_FIELDS: AddressFieldNames = AddressFieldNames {
    name: None,
    ..AddressFieldNames::STANDARD
};

const SHIPPING_FIELDS: AddressFieldNames = AddressFieldNames {
    name: None,
    phone: None,
    ..AddressFieldNames::STANDARD
};

#[derive(Debug, Default, Serialize)]
pub struct NmiCustomerDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    orderid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    order_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<Email>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ipaddress: Option<Secret<String, IpAddress>>,
    #[serde(flatten)]
    address: BTreeMap<String, Secret<String>>,
}

impl From<&PaymentOptions> for NmiCustomerDetails {
    fn from(options: &PaymentOptions) -> Self {
        let mut address = BTreeMap::new();
        add_address(&mut address, options.billing_address.as_ref(), &BILLING_FIELDS);

        if let Some(shipping) = options.shipping_address.as_ref() {
            add_address_with_prefix(
                &mut address,
                Some(shipping),
                &SHIPPING_FIELDS.with_prefix("shipping_"),
            );
            let (first_name, last_name) = shipping.split_name();
            address.extend(
                [("shipping_firstname", first_name), ("shipping_lastname", last_name)]
                    .into_iter()
                    .filter_map(|(key, value)| value.map(|value| (key.to_string(), value))),
            );
        }

        Self {
            orderid: options.order_id.clone(),
            order_description: options.description.clone(),
            email: options.email.clone(),
            ipaddress: options.ip.clone(),
            address,
        }
    }
}

// ===== PAYMENT REQUEST =====

#[derive(Debug, Serialize)]
pub struct NmiPaymentsRequest {
    security_key: Secret<String>,
    #[serde(rename = "type")]
    transaction_type: TransactionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    amount: Option<StringMajorUnit>,
    currency: Currency,
    #[serde(flatten)]
    payment_method: NmiPaymentMethod,
    #[serde(flatten)]
    customer: NmiCustomerDetails,
}

impl NmiPaymentsRequest {
    fn new(
        auth_type: &ConnectorAuthType,
        transaction_type: TransactionType,
        amount: Option<StringMajorUnit>,
        currency: Currency,
        payment_method: &PaymentMethodData,
        options: &PaymentOptions,
    ) -> Result<Self, Error> {
        let auth = NmiAuthType::try_from(auth_type)?;
        Ok(Self {
            security_key: auth.security_key,
            transaction_type,
            amount,
            currency,
            payment_method: NmiPaymentMethod::from(payment_method),
            customer: NmiCustomerDetails::from(options),
        })
    }

    fn for_payment(
        item: &PaymentsAuthorizeData,
        auth_type: &ConnectorAuthType,
        transaction_type: TransactionType,
    ) -> Result<Self, Error> {
        let amount = convert_amount(&StringMajorUnitForConnector, item.amount, item.currency)?;
        Self::new(
            auth_type,
            transaction_type,
            Some(amount),
            item.currency,
            &item.payment_method,
            &item.options,
        )
    }
}

impl TryFrom<&RouterData<Purchase, PaymentsAuthorizeData>> for NmiPaymentsRequest {
    type Error = Error;

    fn try_from(item: &RouterData<Purchase, PaymentsAuthorizeData>) -> Result<Self, Self::Error> {
        Self::for_payment(&item.request, &item.connector_auth_type, TransactionType::Sale)
    }
}

impl TryFrom<&RouterData<Authorize, PaymentsAuthorizeData>> for NmiPaymentsRequest {
    type Error = Error;

    fn try_from(item: &RouterData<Authorize, PaymentsAuthorizeData>) -> Result<Self, Self::Error> {
        Self::for_payment(&item.request, &item.connector_auth_type, TransactionType::Auth)
    }
}

// validate checks the card without moving money, so no amount is sent
impl TryFrom<&RouterData<Verify, PaymentsVerifyData>> for NmiPaymentsRequest {
    type Error = Error;

    fn try_from(item: &RouterData<Verify, PaymentsVerifyData>) -> Result<Self, Self::Error> {
        Self::new(
            &item.connector_auth_type,
            TransactionType::Validate,
            None,
            item.request.currency,
            &item.request.payment_method,
            &item.request.options,
        )
    }
}

// ===== FOLLOW-UP REQUESTS =====

#[derive(Debug, Serialize)]
pub struct NmiReferenceRequest {
    security_key: Secret<String>,
    #[serde(rename = "type")]
    transaction_type: TransactionType,
    transactionid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    amount: Option<StringMajorUnit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    orderid: Option<String>,
}

pub type NmiCaptureRequest = NmiReferenceRequest;
pub type NmiRefundRequest = NmiReferenceRequest;
pub type NmiVoidRequest = NmiReferenceRequest;

/// The transaction id an NMI authorization refers to.
pub fn transaction_id(authorization: &AuthorizationToken) -> Result<String, Error> {
    authorization
        .primary()
        .filter(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_string)
        .ok_or_else(|| {
            errors::ConnectorError::InvalidAuthorization {
                authorization: authorization.to_string(),
                connector: CONNECTOR,
            }
            .into()
        })
}

impl NmiReferenceRequest {
    fn new(
        auth_type: &ConnectorAuthType,
        transaction_type: TransactionType,
        authorization: &AuthorizationToken,
        amount: Option<StringMajorUnit>,
        options: &PaymentOptions,
    ) -> Result<Self, Error> {
        let auth = NmiAuthType::try_from(auth_type)?;
        Ok(Self {
            security_key: auth.security_key,
            transaction_type,
            transactionid: transaction_id(authorization)?,
            amount,
            orderid: options.order_id.clone(),
        })
    }
}

impl TryFrom<&RouterData<Capture, PaymentsCaptureData>> for NmiReferenceRequest {
    type Error = Error;

    fn try_from(item: &RouterData<Capture, PaymentsCaptureData>) -> Result<Self, Self::Error> {
        let amount = convert_amount(
            &StringMajorUnitForConnector,
            item.request.amount,
            item.request.currency,
        )?;
        Self::new(
            &item.connector_auth_type,
            TransactionType::Capture,
            &item.request.authorization,
            Some(amount),
            &item.request.options,
        )
    }
}

impl TryFrom<&RouterData<Refund, RefundsData>> for NmiReferenceRequest {
    type Error = Error;

    fn try_from(item: &RouterData<Refund, RefundsData>) -> Result<Self, Self::Error> {
        let amount = convert_amount(
            &StringMajorUnitForConnector,
            item.request.amount,
            item.request.currency,
        )?;
        Self::new(
            &item.connector_auth_type,
            TransactionType::Refund,
            &item.request.authorization,
            Some(amount),
            &item.request.options,
        )
    }
}

impl TryFrom<&RouterData<Void, PaymentVoidData>> for NmiReferenceRequest {
    type Error = Error;

    fn try_from(item: &RouterData<Void, PaymentVoidData>) -> Result<Self, Self::Error> {
        Self::new(
            &item.connector_auth_type,
            TransactionType::Void,
            &item.request.authorization,
            None,
            &item.request.options,
        )
    }
}

// ===== CUSTOMER VAULT =====

#[derive(Debug, Serialize)]
pub struct NmiVaultRequest {
    security_key: Secret<String>,
    customer_vault: CustomerVaultAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    customer_vault_id: Option<String>,
    #[serde(flatten)]
    payment_method: NmiPaymentMethod,
    #[serde(flatten)]
    customer: NmiCustomerDetails,
}

pub type NmiStoreRequest = NmiVaultRequest;
pub type NmiUnstoreRequest = NmiVaultRequest;

impl TryFrom<&RouterData<Store, PaymentMethodStoreData>> for NmiVaultRequest {
    type Error = Error;

    fn try_from(item: &RouterData<Store, PaymentMethodStoreData>) -> Result<Self, Self::Error> {
        let auth = NmiAuthType::try_from(&item.connector_auth_type)?;
        let card = item.request.get_card()?;
        Ok(Self {
            security_key: auth.security_key,
            customer_vault: CustomerVaultAction::AddCustomer,
            customer_vault_id: None,
            payment_method: NmiPaymentMethod::from(card),
            customer: NmiCustomerDetails::from(&item.request.options),
        })
    }
}

impl TryFrom<&RouterData<Unstore, PaymentMethodUnstoreData>> for NmiVaultRequest {
    type Error = Error;

    fn try_from(
        item: &RouterData<Unstore, PaymentMethodUnstoreData>,
    ) -> Result<Self, Self::Error> {
        let auth = NmiAuthType::try_from(&item.connector_auth_type)?;
        Ok(Self {
            security_key: auth.security_key,
            customer_vault: CustomerVaultAction::DeleteCustomer,
            customer_vault_id: Some(transaction_id(&item.request.authorization)?),
            payment_method: NmiPaymentMethod::default(),
            customer: NmiCustomerDetails::default(),
        })
    }
}

// ===== RESPONSE =====

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StandardResponse {
    // "1" = approved, "2" = declined, "3" = error
    pub response: String,
    #[serde(default)]
    pub responsetext: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub authcode: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub transactionid: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub avsresponse: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub cvvresponse: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub orderid: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "empty_string_as_none")]
    pub transaction_type: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub response_code: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub customer_vault_id: Option<String>,
}

impl StandardResponse {
    pub fn is_approved(&self) -> bool {
        self.response == "1"
    }

    /// Classify a declined or errored transaction by NMI's `response_code`.
    pub fn standard_error_code(&self) -> StandardErrorCode {
        if self.response == "3" && self.responsetext.starts_with("Authentication Failed") {
            return StandardErrorCode::AuthenticationFailure;
        }
        match self.response_code.as_deref() {
            Some("220") | Some("221") | Some("222") => StandardErrorCode::InvalidNumber,
            Some("223") => StandardErrorCode::ExpiredCard,
            Some("224") => StandardErrorCode::InvalidExpiryDate,
            Some("225") => StandardErrorCode::IncorrectCvc,
            Some("240") => StandardErrorCode::CallIssuer,
            Some("250") | Some("251") | Some("252") | Some("253") => {
                StandardErrorCode::PickupCard
            }
            Some("410") | Some("411") => StandardErrorCode::ConfigError,
            Some("460") | Some("461") => StandardErrorCode::UnsupportedFeature,
            _ if self.response == "2" => StandardErrorCode::CardDeclined,
            _ => StandardErrorCode::ProcessingError,
        }
    }

    fn into_builder(
        self,
        authorization: Option<String>,
    ) -> Result<GatewayResponseBuilder, Error> {
        let params = response_params(&self)?;
        let success = self.is_approved();
        if !success {
            tracing::info!(
                connector = CONNECTOR,
                response = %self.response,
                response_code = self.response_code.as_deref(),
                "transaction not approved"
            );
        }

        Ok(GatewayResponse::builder(success, self.responsetext.clone())
            .params(params)
            .authorization(authorization.map(AuthorizationToken::single))
            .avs_result(AvsResult::new(self.avsresponse.as_deref()))
            .cvv_result(CvvResult::new(self.cvvresponse.as_deref()))
            .error_code((!success).then(|| self.standard_error_code())))
    }
}

/// Transaction API reply; the authorization is the transaction id.
#[derive(Debug, Deserialize, Clone)]
#[serde(transparent)]
pub struct NmiTransactionResponse(pub StandardResponse);

pub type NmiPurchaseResponse = NmiTransactionResponse;
pub type NmiAuthorizeResponse = NmiTransactionResponse;
pub type NmiCaptureResponse = NmiTransactionResponse;
pub type NmiRefundResponse = NmiTransactionResponse;
pub type NmiVoidResponse = NmiTransactionResponse;
pub type NmiVerifyResponse = NmiTransactionResponse;

impl<F, Req> TryFrom<ResponseRouterData<NmiTransactionResponse, &RouterData<F, Req>>>
    for GatewayResponseBuilder
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<NmiTransactionResponse, &RouterData<F, Req>>,
    ) -> Result<Self, Self::Error> {
        let response = item.response.0;
        let authorization = response.transactionid.clone();
        response.into_builder(authorization)
    }
}

/// Customer vault reply; the authorization is the vault id.
#[derive(Debug, Deserialize, Clone)]
#[serde(transparent)]
pub struct NmiVaultResponse(pub StandardResponse);

pub type NmiStoreResponse = NmiVaultResponse;
pub type NmiUnstoreResponse = NmiVaultResponse;

impl<F, Req> TryFrom<ResponseRouterData<NmiVaultResponse, &RouterData<F, Req>>>
    for GatewayResponseBuilder
{
    type Error = Error;

    fn try_from(
        item: ResponseRouterData<NmiVaultResponse, &RouterData<F, Req>>,
    ) -> Result<Self, Self::Error> {
        let response = item.response.0;
        let authorization = response.customer_vault_id.clone();
        response.into_builder(authorization)
    }
}
