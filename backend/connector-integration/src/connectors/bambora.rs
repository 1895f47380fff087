pub mod transformers;


use common_enums::{CardNetwork, CountryAlpha2, Currency, GatewayMode, MoneyFormat};
use common_utils::{errors::CustomResult, ext_traits::BytesExt};
use domain_types::{
    connector_flow::{Authorize, Capture, Purchase, Refund, Store, Unstore, Verify, Void},
    connector_types::{
        PaymentMethodStoreData, PaymentMethodUnstoreData, PaymentVoidData, PaymentsAuthorizeData,
        PaymentsCaptureData, PaymentsVerifyData, RefundsData,
    },
    errors,
    router_data::{ConnectorAuthType, ErrorResponse, RouterData},
    router_response_types::Response,
    types::Connectors,
};
use error_stack::ResultExt;
use hyperswitch_masking::{Mask, Maskable};
use interfaces::{
    api::ConnectorCommon, connector_integration::ConnectorIntegration, connector_types,
};
use transformers as bambora;

use crate::connectors::macros;

pub(crate) mod headers {
    pub(crate) const CONTENT_TYPE: &str = "Content-Type";
    pub(crate) const AUTHORIZATION: &str = "Authorization";
}

use transformers::{
    BamboraAuthorization, BamboraAuthorizeResponse, BamboraCaptureRequest, BamboraCaptureResponse,
    BamboraPaymentsRequest, BamboraProfileRequest, BamboraPurchaseResponse, BamboraRefundRequest,
    BamboraRefundResponse, BamboraStoreResponse, BamboraUnstoreResponse, BamboraVoidRequest,
    BamboraVoidResponse,
};

macros::create_all_prerequisites!(
    connector_name: Bambora,
    member_functions: {
        pub fn build_headers<F, Req>(
            &self,
            req: &RouterData<F, Req>,
        ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
            let mut header = vec![(
                headers::CONTENT_TYPE.to_string(),
                self.common_get_content_type().to_string().into(),
            )];
            let mut auth_header = self.get_auth_header(&req.connector_auth_type)?;
            header.append(&mut auth_header);
            Ok(header)
        }

        pub fn connector_base_url<'a, F, Req>(&self, req: &'a RouterData<F, Req>) -> &'a str {
            self.base_url(&req.connectors, req.gateway_mode)
                .trim_end_matches('/')
        }

        fn transaction_id(
            &self,
            authorization: &domain_types::gateway_response::AuthorizationToken,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(BamboraAuthorization::try_from(authorization)?.transaction_id)
        }
    }
);

impl connector_types::ConnectorServiceTrait for Bambora {}
impl connector_types::PaymentPurchase for Bambora {}
impl connector_types::PaymentAuthorize for Bambora {}
impl connector_types::PaymentCapture for Bambora {}
impl connector_types::PaymentVoid for Bambora {}
impl connector_types::PaymentVerify for Bambora {}
impl connector_types::RefundExecute for Bambora {}
impl connector_types::PaymentMethodStore for Bambora {}
impl connector_types::PaymentMethodUnstore for Bambora {}

// verify runs as a $1.00 authorize followed by a void
impl connector_types::ValidationTrait for Bambora {}

impl ConnectorIntegration<Verify, PaymentsVerifyData> for Bambora {}

impl ConnectorCommon for Bambora {
    fn id(&self) -> &'static str {
        "bambora"
    }

    fn display_name(&self) -> &'static str {
        "Bambora"
    }

    fn homepage_url(&self) -> &'static str {
        "https://www.bambora.com/"
    }

    fn supported_countries(&self) -> &'static [CountryAlpha2] {
        &[CountryAlpha2::CA, CountryAlpha2::US]
    }

    fn supported_card_networks(&self) -> &'static [CardNetwork] {
        &[
            CardNetwork::Visa,
            CardNetwork::Mastercard,
            CardNetwork::AmericanExpress,
            CardNetwork::Discover,
            CardNetwork::DinersClub,
            CardNetwork::JCB,
        ]
    }

    fn default_currency(&self) -> Currency {
        Currency::CAD
    }

    fn money_format(&self) -> MoneyFormat {
        MoneyFormat::Dollars
    }

    fn common_get_content_type(&self) -> &'static str {
        "application/json"
    }

    fn base_url<'a>(&self, connectors: &'a Connectors, mode: GatewayMode) -> &'a str {
        connectors.bambora.base_url_for(mode)
    }

    fn get_auth_header(
        &self,
        auth_type: &ConnectorAuthType,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
        let auth = bambora::BamboraAuthType::try_from(auth_type)
            .change_context(errors::ConnectorError::FailedToObtainAuthType)?;
        Ok(vec![(
            headers::AUTHORIZATION.to_string(),
            auth.generate_authorization_header().into_masked(),
        )])
    }

    fn build_error_response(
        &self,
        res: Response,
    ) -> CustomResult<ErrorResponse, errors::ConnectorError> {
        let response: bambora::BamboraErrorResponse = res
            .response
            .parse_struct("BamboraErrorResponse")
            .change_context(errors::ConnectorError::ResponseDeserializationFailed)?;

        tracing::info!(connector_response = ?response, "bambora error response");

        Ok(ErrorResponse {
            status_code: res.status_code,
            code: response.code.to_string(),
            message: response.message.clone(),
            reason: Some(format!(
                "Category: {}, Reference: {}",
                response.category, response.reference
            )),
            standard_error_code: response.standard_error_code(res.status_code),
        })
    }
}

// ===== MACRO-BASED CONNECTOR INTEGRATION IMPLEMENTATIONS =====

// Purchase Flow
macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response],
    connector: Bambora,
    curl_request: Json(BamboraPaymentsRequest),
    curl_response: Json(BamboraPurchaseResponse),
    flow_name: Purchase,
    flow_request: PaymentsAuthorizeData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterData<Purchase, PaymentsAuthorizeData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(format!("{}/payments", self.connector_base_url(req)))
        }
    }
);

// Authorize Flow
macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response],
    connector: Bambora,
    curl_request: Json(BamboraPaymentsRequest),
    curl_response: Json(BamboraAuthorizeResponse),
    flow_name: Authorize,
    flow_request: PaymentsAuthorizeData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterData<Authorize, PaymentsAuthorizeData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(format!("{}/payments", self.connector_base_url(req)))
        }
    }
);

// Capture Flow
macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response],
    connector: Bambora,
    curl_request: Json(BamboraCaptureRequest),
    curl_response: Json(BamboraCaptureResponse),
    flow_name: Capture,
    flow_request: PaymentsCaptureData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterData<Capture, PaymentsCaptureData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(format!(
                "{}/payments/{}/completions",
                self.connector_base_url(req),
                self.transaction_id(&req.request.authorization)?
            ))
        }
    }
);

// Refund Flow
macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response],
    connector: Bambora,
    curl_request: Json(BamboraRefundRequest),
    curl_response: Json(BamboraRefundResponse),
    flow_name: Refund,
    flow_request: RefundsData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterData<Refund, RefundsData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(format!(
                "{}/payments/{}/returns",
                self.connector_base_url(req),
                self.transaction_id(&req.request.authorization)?
            ))
        }
    }
);

// Void Flow
macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response],
    connector: Bambora,
    curl_request: Json(BamboraVoidRequest),
    curl_response: Json(BamboraVoidResponse),
    flow_name: Void,
    flow_request: PaymentVoidData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterData<Void, PaymentVoidData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(format!(
                "{}/payments/{}/void",
                self.connector_base_url(req),
                self.transaction_id(&req.request.authorization)?
            ))
        }
    }
);

// Store Flow
macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response],
    connector: Bambora,
    curl_request: Json(BamboraProfileRequest),
    curl_response: Json(BamboraStoreResponse),
    flow_name: Store,
    flow_request: PaymentMethodStoreData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterData<Store, PaymentMethodStoreData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(format!("{}/profiles", self.connector_base_url(req)))
        }
    }
);

// Unstore Flow
macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response],
    connector: Bambora,
    curl_response: Json(BamboraUnstoreResponse),
    flow_name: Unstore,
    flow_request: PaymentMethodUnstoreData,
    http_method: Delete,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterData<Unstore, PaymentMethodUnstoreData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            let customer_code = req.request.authorization.primary().ok_or_else(|| {
                errors::ConnectorError::InvalidAuthorization {
                    authorization: req.request.authorization.to_string(),
                    connector: "bambora",
                }
            })?;
            Ok(format!(
                "{}/profiles/{}",
                self.connector_base_url(req),
                customer_code
            ))
        }
    }
);
