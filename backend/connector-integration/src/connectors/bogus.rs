//! Offline gateway for integration tests. Outcomes are chosen by the last
//! character of the card number, stored token or authorization.

use common_enums::{CardNetwork, CountryAlpha2, GatewayMode, StandardErrorCode};
use common_utils::{errors::CustomResult, MinorUnit};
use domain_types::{
    connector_flow::{Authorize, Capture, Purchase, Refund, Store, Unstore, Verify, Void},
    connector_types::{
        PaymentMethodStoreData, PaymentMethodUnstoreData, PaymentOptions, PaymentVoidData,
        PaymentsAuthorizeData, PaymentsCaptureData, PaymentsVerifyData, RefundsData,
    },
    errors,
    gateway_response::{AuthorizationToken, GatewayResponse},
    payment_method_data::PaymentMethodData,
    router_data::ErrorResponse,
    router_response_types::Response,
    types::Connectors,
};
use error_stack::report;
use hyperswitch_masking::PeekInterface;
use interfaces::{
    api::ConnectorCommon,
    connector_integration::ConnectorIntegration,
    connector_types,
    gateway::{GatewayResult, PaymentGateway},
};

use crate::connectors::macros;

pub const AUTHORIZATION: &str = "53433";
pub const SUCCESS_MESSAGE: &str = "Bogus Gateway: Forced success";
pub const FAILURE_MESSAGE: &str = "Bogus Gateway: Forced failure";
const NUMBER_ERROR_MESSAGE: &str = "Bogus Gateway: Use CreditCard number ending in 1 for success, 2 for exception and anything else for error";
const AUTHORIZATION_ERROR_MESSAGE: &str = "Bogus Gateway: Use authorization number ending in 1 for exception, 2 for error and anything else for success";
const UNSTORE_ERROR_MESSAGE: &str = "Bogus Gateway: Use trans_id ending in 1 for success, 2 for exception and anything else for error";

macros::create_all_prerequisites!(
    connector_name: Bogus,
    member_functions: {}
);

impl connector_types::ConnectorServiceTrait for Bogus {}
impl connector_types::PaymentPurchase for Bogus {}
impl connector_types::PaymentAuthorize for Bogus {}
impl connector_types::PaymentCapture for Bogus {}
impl connector_types::PaymentVoid for Bogus {}
impl connector_types::PaymentVerify for Bogus {}
impl connector_types::RefundExecute for Bogus {}
impl connector_types::PaymentMethodStore for Bogus {}
impl connector_types::PaymentMethodUnstore for Bogus {}
impl connector_types::ValidationTrait for Bogus {}

// nothing goes over the wire; BogusGateway answers every operation itself
impl ConnectorIntegration<Purchase, PaymentsAuthorizeData> for Bogus {}
impl ConnectorIntegration<Authorize, PaymentsAuthorizeData> for Bogus {}
impl ConnectorIntegration<Capture, PaymentsCaptureData> for Bogus {}
impl ConnectorIntegration<Refund, RefundsData> for Bogus {}
impl ConnectorIntegration<Void, PaymentVoidData> for Bogus {}
impl ConnectorIntegration<Verify, PaymentsVerifyData> for Bogus {}
impl ConnectorIntegration<Store, PaymentMethodStoreData> for Bogus {}
impl ConnectorIntegration<Unstore, PaymentMethodUnstoreData> for Bogus {}

impl ConnectorCommon for Bogus {
    fn id(&self) -> &'static str {
        "bogus"
    }

    fn display_name(&self) -> &'static str {
        "Bogus"
    }

    fn homepage_url(&self) -> &'static str {
        "http://example.com"
    }

    fn supported_countries(&self) -> &'static [CountryAlpha2] {
        &[CountryAlpha2::US]
    }

    fn supported_card_networks(&self) -> &'static [CardNetwork] {
        &[
            CardNetwork::Visa,
            CardNetwork::Mastercard,
            CardNetwork::AmericanExpress,
            CardNetwork::Discover,
        ]
    }

    fn base_url<'a>(&self, connectors: &'a Connectors, mode: GatewayMode) -> &'a str {
        connectors.bogus.base_url_for(mode)
    }

    fn build_error_response(
        &self,
        res: Response,
    ) -> CustomResult<ErrorResponse, errors::ConnectorError> {
        Ok(ErrorResponse {
            status_code: res.status_code,
            code: common_utils::consts::NO_ERROR_CODE.to_string(),
            message: res.body_as_text(),
            reason: None,
            standard_error_code: StandardErrorCode::ProcessingError,
        })
    }
}

enum Outcome {
    Success,
    Failure,
    Exception,
}

fn last_char(value: &str) -> Option<char> {
    value.trim().chars().last()
}

/// Card numbers and stored tokens: 1 succeeds, 2 fails, anything else errors.
fn payment_method_outcome(payment_method: &PaymentMethodData) -> Outcome {
    let last = match payment_method {
        PaymentMethodData::Card(card) => last_char(card.number.peek()),
        PaymentMethodData::Token(token) => last_char(token.peek()),
    };
    match last {
        Some('1') => Outcome::Success,
        Some('2') => Outcome::Failure,
        _ => Outcome::Exception,
    }
}

/// Authorizations: 1 errors, 2 fails, anything else succeeds.
fn reference_outcome(authorization: &AuthorizationToken) -> Outcome {
    match last_char(&authorization.to_string()) {
        Some('1') => Outcome::Exception,
        Some('2') => Outcome::Failure,
        _ => Outcome::Success,
    }
}

/// [`PaymentGateway`] that never leaves the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct BogusGateway;

impl BogusGateway {
    pub fn new(mode: GatewayMode) -> Self {
        if !mode.is_test() {
            tracing::warn!("bogus gateway configured outside test mode");
        }
        Self
    }

    fn connector() -> &'static Bogus {
        Bogus::new()
    }

    fn money_params(key: &'static str, amount: MinorUnit) -> (String, String) {
        (key.to_string(), Self::connector().amount(amount))
    }

    fn authorize_like(
        &self,
        amount: MinorUnit,
        payment_method: &PaymentMethodData,
    ) -> GatewayResult {
        let (key, money) = Self::money_params("authorized_amount", amount);
        match payment_method_outcome(payment_method) {
            Outcome::Success => Ok(GatewayResponse::builder(true, SUCCESS_MESSAGE)
                .param(key, money)
                .authorization(Some(AuthorizationToken::single(AUTHORIZATION)))
                .test(true)
                .build()),
            Outcome::Failure => Ok(Self::failure(key, money)),
            Outcome::Exception => Err(report!(errors::ConnectorError::SimulatedException {
                message: NUMBER_ERROR_MESSAGE,
            })),
        }
    }

    fn reference_operation(
        &self,
        key: &'static str,
        amount: Option<MinorUnit>,
        authorization: &AuthorizationToken,
    ) -> GatewayResult {
        let money = amount.map(|amount| Self::connector().amount(amount));
        match reference_outcome(authorization) {
            Outcome::Success => {
                let builder = GatewayResponse::builder(true, SUCCESS_MESSAGE).test(true);
                Ok(match money {
                    Some(money) => builder.param(key, money),
                    None => builder.param("authorization", authorization.to_string()),
                }
                .build())
            }
            Outcome::Failure => Ok(Self::failure(
                key.to_string(),
                money.unwrap_or_else(|| authorization.to_string()),
            )),
            Outcome::Exception => Err(report!(errors::ConnectorError::SimulatedException {
                message: AUTHORIZATION_ERROR_MESSAGE,
            })),
        }
    }

    fn failure(key: String, value: String) -> GatewayResponse {
        GatewayResponse::failure(FAILURE_MESSAGE, StandardErrorCode::ProcessingError)
            .param(key, value)
            .param("error", FAILURE_MESSAGE)
            .test(true)
            .build()
    }
}

#[async_trait::async_trait]
impl PaymentGateway for BogusGateway {
    fn id(&self) -> &'static str {
        Self::connector().id()
    }

    async fn purchase(
        &self,
        amount: MinorUnit,
        payment_method: &PaymentMethodData,
        _options: &PaymentOptions,
    ) -> GatewayResult {
        self.authorize_like(amount, payment_method)
    }

    async fn authorize(
        &self,
        amount: MinorUnit,
        payment_method: &PaymentMethodData,
        _options: &PaymentOptions,
    ) -> GatewayResult {
        self.authorize_like(amount, payment_method)
    }

    async fn capture(
        &self,
        amount: MinorUnit,
        authorization: &AuthorizationToken,
        _options: &PaymentOptions,
    ) -> GatewayResult {
        self.reference_operation("paid_amount", Some(amount), authorization)
    }

    async fn refund(
        &self,
        amount: MinorUnit,
        authorization: &AuthorizationToken,
        _options: &PaymentOptions,
    ) -> GatewayResult {
        self.reference_operation("paid_amount", Some(amount), authorization)
    }

    async fn void(
        &self,
        authorization: &AuthorizationToken,
        _options: &PaymentOptions,
    ) -> GatewayResult {
        self.reference_operation("authorization", None, authorization)
    }

    async fn store(
        &self,
        payment_method: &PaymentMethodData,
        _options: &PaymentOptions,
    ) -> GatewayResult {
        match payment_method_outcome(payment_method) {
            Outcome::Success => Ok(GatewayResponse::builder(true, SUCCESS_MESSAGE)
                .param("billingid", "1")
                .authorization(Some(AuthorizationToken::single("1")))
                .test(true)
                .build()),
            Outcome::Failure => Ok(Self::failure("billingid".to_string(), String::new())),
            Outcome::Exception => Err(report!(errors::ConnectorError::SimulatedException {
                message: NUMBER_ERROR_MESSAGE,
            })),
        }
    }

    async fn unstore(
        &self,
        authorization: &AuthorizationToken,
        _options: &PaymentOptions,
    ) -> GatewayResult {
        match last_char(&authorization.to_string()) {
            Some('1') => Ok(GatewayResponse::builder(true, SUCCESS_MESSAGE)
                .test(true)
                .build()),
            Some('2') => Ok(Self::failure(
                "authorization".to_string(),
                authorization.to_string(),
            )),
            _ => Err(report!(errors::ConnectorError::SimulatedException {
                message: UNSTORE_ERROR_MESSAGE,
            })),
        }
    }
}
