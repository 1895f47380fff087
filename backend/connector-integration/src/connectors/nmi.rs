pub mod transformers;

#[cfg(test)]
mod test;

use common_enums::{CardNetwork, CountryAlpha2, Currency, GatewayMode, MoneyFormat};
use common_utils::{errors::CustomResult, ext_traits::UrlEncodedExt};
use domain_types::{
    connector_flow::{Authorize, Capture, Purchase, Refund, Store, Unstore, Verify, Void},
    connector_types::{
        PaymentMethodStoreData, PaymentMethodUnstoreData, PaymentVoidData, PaymentsAuthorizeData,
        PaymentsCaptureData, PaymentsVerifyData, RefundsData,
    },
    errors,
    router_data::{ErrorResponse, RouterData},
    router_response_types::Response,
    types::Connectors,
};
use error_stack::ResultExt;
use hyperswitch_masking::Maskable;
use interfaces::{api::ConnectorCommon, connector_types};
use transformers::{
    NmiAuthorizeResponse, NmiCaptureRequest, NmiCaptureResponse, NmiPaymentsRequest,
    NmiPurchaseResponse, NmiRefundRequest, NmiRefundResponse, NmiStoreRequest, NmiStoreResponse,
    NmiUnstoreRequest, NmiUnstoreResponse, NmiVerifyResponse, NmiVoidRequest, NmiVoidResponse,
    StandardResponse,
};

use super::macros;

pub(crate) mod headers {
    pub(crate) const CONTENT_TYPE: &str = "Content-Type";
}

pub(crate) mod endpoints {
    pub(crate) const TRANSACT: &str = "/api/transact.php";
}

// ===== CREATE CONNECTOR STRUCT WITH MACROS =====
macros::create_all_prerequisites!(
    connector_name: Nmi,
    member_functions: {
        pub fn build_headers<F, Req>(
            &self,
            _req: &RouterData<F, Req>,
        ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
            Ok(vec![(
                headers::CONTENT_TYPE.to_string(),
                self.common_get_content_type().to_string().into(),
            )])
        }

        pub fn transact_url<F, Req>(&self, req: &RouterData<F, Req>) -> String {
            format!(
                "{}{}",
                self.base_url(&req.connectors, req.gateway_mode)
                    .trim_end_matches('/'),
                endpoints::TRANSACT
            )
        }
    }
);

// ===== CONNECTOR SERVICE TRAIT IMPLEMENTATIONS =====
impl connector_types::ConnectorServiceTrait for Nmi {}
impl connector_types::PaymentPurchase for Nmi {}
impl connector_types::PaymentAuthorize for Nmi {}
impl connector_types::PaymentCapture for Nmi {}
impl connector_types::PaymentVoid for Nmi {}
impl connector_types::PaymentVerify for Nmi {}
impl connector_types::RefundExecute for Nmi {}
impl connector_types::PaymentMethodStore for Nmi {}
impl connector_types::PaymentMethodUnstore for Nmi {}

impl connector_types::ValidationTrait for Nmi {
    fn should_do_native_verify(&self) -> bool {
        true
    }
}

// ===== CONNECTOR COMMON IMPLEMENTATION =====
impl ConnectorCommon for Nmi {
    fn id(&self) -> &'static str {
        "nmi"
    }

    fn display_name(&self) -> &'static str {
        "NMI"
    }

    fn homepage_url(&self) -> &'static str {
        "https://nmi.com/"
    }

    fn supported_countries(&self) -> &'static [CountryAlpha2] {
        &[CountryAlpha2::US, CountryAlpha2::CA]
    }

    fn supported_card_networks(&self) -> &'static [CardNetwork] {
        &[
            CardNetwork::Visa,
            CardNetwork::Mastercard,
            CardNetwork::AmericanExpress,
            CardNetwork::Discover,
        ]
    }

    fn default_currency(&self) -> Currency {
        Currency::USD
    }

    // NMI takes base currency units (dollars, not cents)
    fn money_format(&self) -> MoneyFormat {
        MoneyFormat::Dollars
    }

    fn common_get_content_type(&self) -> &'static str {
        "application/x-www-form-urlencoded"
    }

    fn base_url<'a>(&self, connectors: &'a Connectors, mode: GatewayMode) -> &'a str {
        connectors.nmi.base_url_for(mode)
    }

    fn build_error_response(
        &self,
        res: Response,
    ) -> CustomResult<ErrorResponse, errors::ConnectorError> {
        let response: StandardResponse = res
            .response
            .parse_urlencoded("StandardResponse")
            .change_context(errors::ConnectorError::ResponseDeserializationFailed)?;

        tracing::info!(
            response_code = response.response_code.as_deref(),
            "nmi error response"
        );

        Ok(ErrorResponse {
            status_code: res.status_code,
            code: response
                .response_code
                .clone()
                .unwrap_or_else(|| common_utils::consts::NO_ERROR_CODE.to_string()),
            message: response.responsetext.clone(),
            reason: response.transactionid.clone(),
            standard_error_code: response.standard_error_code(),
        })
    }
}

// ===== MAIN CONNECTOR INTEGRATION IMPLEMENTATIONS =====
// Purchase
macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response],
    connector: Nmi,
    curl_request: FormUrlEncoded(NmiPaymentsRequest),
    curl_response: FormUrlEncoded(NmiPurchaseResponse),
    flow_name: Purchase,
    flow_request: PaymentsAuthorizeData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterData<Purchase, PaymentsAuthorizeData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(self.transact_url(req))
        }
    }
);

// Authorize
macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response],
    connector: Nmi,
    curl_request: FormUrlEncoded(NmiPaymentsRequest),
    curl_response: FormUrlEncoded(NmiAuthorizeResponse),
    flow_name: Authorize,
    flow_request: PaymentsAuthorizeData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterData<Authorize, PaymentsAuthorizeData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(self.transact_url(req))
        }
    }
);

// Payment Capture
macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response],
    connector: Nmi,
    curl_request: FormUrlEncoded(NmiCaptureRequest),
    curl_response: FormUrlEncoded(NmiCaptureResponse),
    flow_name: Capture,
    flow_request: PaymentsCaptureData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterData<Capture, PaymentsCaptureData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(self.transact_url(req))
        }
    }
);

// Payment Void
macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response],
    connector: Nmi,
    curl_request: FormUrlEncoded(NmiVoidRequest),
    curl_response: FormUrlEncoded(NmiVoidResponse),
    flow_name: Void,
    flow_request: PaymentVoidData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterData<Void, PaymentVoidData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(self.transact_url(req))
        }
    }
);

// Refund
macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response],
    connector: Nmi,
    curl_request: FormUrlEncoded(NmiRefundRequest),
    curl_response: FormUrlEncoded(NmiRefundResponse),
    flow_name: Refund,
    flow_request: RefundsData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterData<Refund, RefundsData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(self.transact_url(req))
        }
    }
);

// Verify
macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response],
    connector: Nmi,
    curl_request: FormUrlEncoded(NmiPaymentsRequest),
    curl_response: FormUrlEncoded(NmiVerifyResponse),
    flow_name: Verify,
    flow_request: PaymentsVerifyData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterData<Verify, PaymentsVerifyData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(self.transact_url(req))
        }
    }
);

// Customer vault add
macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response],
    connector: Nmi,
    curl_request: FormUrlEncoded(NmiStoreRequest),
    curl_response: FormUrlEncoded(NmiStoreResponse),
    flow_name: Store,
    flow_request: PaymentMethodStoreData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterData<Store, PaymentMethodStoreData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(self.transact_url(req))
        }
    }
);

// Customer vault delete
macros::macro_connector_implementation!(
    connector_default_implementations: [get_headers, get_content_type, get_error_response],
    connector: Nmi,
    curl_request: FormUrlEncoded(NmiUnstoreRequest),
    curl_response: FormUrlEncoded(NmiUnstoreResponse),
    flow_name: Unstore,
    flow_request: PaymentMethodUnstoreData,
    http_method: Post,
    other_functions: {
        fn get_url(
            &self,
            req: &RouterData<Unstore, PaymentMethodUnstoreData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(self.transact_url(req))
        }
    }
);
