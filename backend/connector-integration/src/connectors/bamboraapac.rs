pub mod transformers;

#[cfg(test)]
mod test;

use common_enums::{CardNetwork, CountryAlpha2, Currency, GatewayMode, MoneyFormat};
use common_utils::{errors::CustomResult, ext_traits::XmlExt};
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
use interfaces::{
    api::ConnectorCommon, connector_integration::ConnectorIntegration, connector_types,
};

use crate::connectors::macros;

pub(crate) mod headers {
    pub(crate) const CONTENT_TYPE: &str = "Content-Type";
    pub(crate) const SOAP_ACTION: &str = "SOAPAction";
}

use transformers::{
    BamboraapacAuthorizeResponse, BamboraapacCaptureRequest, BamboraapacCaptureResponse,
    BamboraapacFaultEnvelope, BamboraapacPaymentRequest, BamboraapacPurchaseResponse,
    BamboraapacRefundRequest, BamboraapacRefundResponse, BamboraapacStoreResponse,
    BamboraapacTokeniseRequest, BamboraapacVoidRequest, BamboraapacVoidResponse,
};

macros::create_all_prerequisites!(
    connector_name: Bamboraapac,
    member_functions: {
        pub fn soap_headers(
            &self,
            action: &str,
        ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
            Ok(vec![
                (
                    headers::CONTENT_TYPE.to_string(),
                    self.common_get_content_type().to_string().into(),
                ),
                (headers::SOAP_ACTION.to_string(), action.to_string().into()),
            ])
        }

        pub fn connector_base_url<'a, F, Req>(&self, req: &'a RouterData<F, Req>) -> &'a str {
            self.base_url(&req.connectors, req.gateway_mode)
                .trim_end_matches('/')
        }

        pub fn preprocess_response_bytes(
            &self,
            response_bytes: bytes::Bytes,
        ) -> CustomResult<bytes::Bytes, errors::ConnectorError> {
            let response_str = String::from_utf8(response_bytes.to_vec())
                .change_context(errors::ConnectorError::ResponseDeserializationFailed)?;

            Ok(bytes::Bytes::from(strip_soap_namespaces(&response_str)))
        }
    }
);

/// Drop namespace prefixes and declarations so the envelope deserializes
/// into plain structs.
fn strip_soap_namespaces(response: &str) -> String {
    response
        .replace("soap:", "")
        .replace(
            " xmlns:soap=\"http://schemas.xmlsoap.org/soap/envelope/\"",
            "",
        )
        .replace(
            " xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\"",
            "",
        )
        .replace(" xmlns:xsd=\"http://www.w3.org/2001/XMLSchema\"", "")
        .replace(
            " xmlns=\"http://www.ippayments.com.au/interface/api/dts\"",
            "",
        )
        .replace(
            " xmlns=\"http://www.ippayments.com.au/interface/api/sipp\"",
            "",
        )
}

impl connector_types::ConnectorServiceTrait for Bamboraapac {}
impl connector_types::PaymentPurchase for Bamboraapac {}
impl connector_types::PaymentAuthorize for Bamboraapac {}
impl connector_types::PaymentCapture for Bamboraapac {}
impl connector_types::PaymentVoid for Bamboraapac {}
impl connector_types::PaymentVerify for Bamboraapac {}
impl connector_types::RefundExecute for Bamboraapac {}
impl connector_types::PaymentMethodStore for Bamboraapac {}
impl connector_types::PaymentMethodUnstore for Bamboraapac {}
impl connector_types::ValidationTrait for Bamboraapac {}

impl ConnectorIntegration<Verify, PaymentsVerifyData> for Bamboraapac {}

// tokens cannot be deleted through the SIPP API
impl ConnectorIntegration<Unstore, PaymentMethodUnstoreData> for Bamboraapac {}

impl ConnectorCommon for Bamboraapac {
    fn id(&self) -> &'static str {
        "bamboraapac"
    }

    fn display_name(&self) -> &'static str {
        "Bambora Asia-Pacific"
    }

    fn homepage_url(&self) -> &'static str {
        "http://www.bambora.com/en/au"
    }

    fn supported_countries(&self) -> &'static [CountryAlpha2] {
        &[CountryAlpha2::AU, CountryAlpha2::NZ]
    }

    fn supported_card_networks(&self) -> &'static [CardNetwork] {
        &[
            CardNetwork::Visa,
            CardNetwork::Mastercard,
            CardNetwork::AmericanExpress,
            CardNetwork::DinersClub,
            CardNetwork::JCB,
        ]
    }

    fn default_currency(&self) -> Currency {
        Currency::AUD
    }

    fn money_format(&self) -> MoneyFormat {
        MoneyFormat::Cents
    }

    fn common_get_content_type(&self) -> &'static str {
        "text/xml"
    }

    fn base_url<'a>(&self, connectors: &'a Connectors, mode: GatewayMode) -> &'a str {
        connectors.bamboraapac.base_url_for(mode)
    }

    fn build_error_response(
        &self,
        res: Response,
    ) -> CustomResult<ErrorResponse, errors::ConnectorError> {
        let body = self.preprocess_response_bytes(res.response)?;
        let body = std::str::from_utf8(&body)
            .change_context(errors::ConnectorError::ResponseDeserializationFailed)?;
        let response: BamboraapacFaultEnvelope = body
            .parse_xml("BamboraapacFaultEnvelope")
            .change_context(errors::ConnectorError::ResponseDeserializationFailed)?;

        tracing::info!(
            fault_code = %response.body.fault.fault_code,
            "bamboraapac soap fault"
        );

        let standard_error_code = if response.body.fault.fault_code.contains("Client") {
            common_enums::StandardErrorCode::ConfigError
        } else {
            common_enums::StandardErrorCode::ProcessingError
        };
        Ok(ErrorResponse {
            status_code: res.status_code,
            code: response.body.fault.fault_code,
            message: response.body.fault.fault_string,
            reason: None,
            standard_error_code,
        })
    }

    fn unparsable_response_message(&self) -> &'static str {
        common_utils::consts::UNPARSABLE_RESPONSE_MESSAGE
    }
}

// ===== MACRO-BASED CONNECTOR INTEGRATION IMPLEMENTATIONS =====

// Purchase Flow
macros::macro_connector_implementation!(
    connector_default_implementations: [get_content_type, get_error_response],
    connector: Bamboraapac,
    curl_request: SoapXml(BamboraapacPaymentRequest),
    curl_response: Xml(BamboraapacPurchaseResponse),
    flow_name: Purchase,
    flow_request: PaymentsAuthorizeData,
    http_method: Post,
    preprocess_response: true,
    other_functions: {
        fn get_headers(
            &self,
            _req: &RouterData<Purchase, PaymentsAuthorizeData>,
        ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
            self.soap_headers(transformers::dts_action("SubmitSinglePayment").as_str())
        }

        fn get_url(
            &self,
            req: &RouterData<Purchase, PaymentsAuthorizeData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(format!("{}/dts.asmx", self.connector_base_url(req)))
        }
    }
);

// Authorize Flow
macros::macro_connector_implementation!(
    connector_default_implementations: [get_content_type, get_error_response],
    connector: Bamboraapac,
    curl_request: SoapXml(BamboraapacPaymentRequest),
    curl_response: Xml(BamboraapacAuthorizeResponse),
    flow_name: Authorize,
    flow_request: PaymentsAuthorizeData,
    http_method: Post,
    preprocess_response: true,
    other_functions: {
        fn get_headers(
            &self,
            _req: &RouterData<Authorize, PaymentsAuthorizeData>,
        ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
            self.soap_headers(transformers::dts_action("SubmitSinglePayment").as_str())
        }

        fn get_url(
            &self,
            req: &RouterData<Authorize, PaymentsAuthorizeData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(format!("{}/dts.asmx", self.connector_base_url(req)))
        }
    }
);

// Capture Flow
macros::macro_connector_implementation!(
    connector_default_implementations: [get_content_type, get_error_response],
    connector: Bamboraapac,
    curl_request: SoapXml(BamboraapacCaptureRequest),
    curl_response: Xml(BamboraapacCaptureResponse),
    flow_name: Capture,
    flow_request: PaymentsCaptureData,
    http_method: Post,
    preprocess_response: true,
    other_functions: {
        fn get_headers(
            &self,
            _req: &RouterData<Capture, PaymentsCaptureData>,
        ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
            self.soap_headers(transformers::dts_action("SubmitSingleCapture").as_str())
        }

        fn get_url(
            &self,
            req: &RouterData<Capture, PaymentsCaptureData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(format!("{}/dts.asmx", self.connector_base_url(req)))
        }
    }
);

// Refund Flow
macros::macro_connector_implementation!(
    connector_default_implementations: [get_content_type, get_error_response],
    connector: Bamboraapac,
    curl_request: SoapXml(BamboraapacRefundRequest),
    curl_response: Xml(BamboraapacRefundResponse),
    flow_name: Refund,
    flow_request: RefundsData,
    http_method: Post,
    preprocess_response: true,
    other_functions: {
        fn get_headers(
            &self,
            _req: &RouterData<Refund, RefundsData>,
        ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
            self.soap_headers(transformers::dts_action("SubmitSingleRefund").as_str())
        }

        fn get_url(
            &self,
            req: &RouterData<Refund, RefundsData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(format!("{}/dts.asmx", self.connector_base_url(req)))
        }
    }
);

// Void Flow
macros::macro_connector_implementation!(
    connector_default_implementations: [get_content_type, get_error_response],
    connector: Bamboraapac,
    curl_request: SoapXml(BamboraapacVoidRequest),
    curl_response: Xml(BamboraapacVoidResponse),
    flow_name: Void,
    flow_request: PaymentVoidData,
    http_method: Post,
    preprocess_response: true,
    other_functions: {
        fn get_headers(
            &self,
            _req: &RouterData<Void, PaymentVoidData>,
        ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
            self.soap_headers(transformers::dts_action("SubmitSingleVoid").as_str())
        }

        fn get_url(
            &self,
            req: &RouterData<Void, PaymentVoidData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(format!("{}/dts.asmx", self.connector_base_url(req)))
        }
    }
);

// Store Flow
macros::macro_connector_implementation!(
    connector_default_implementations: [get_content_type, get_error_response],
    connector: Bamboraapac,
    curl_request: SoapXml(BamboraapacTokeniseRequest),
    curl_response: Xml(BamboraapacStoreResponse),
    flow_name: Store,
    flow_request: PaymentMethodStoreData,
    http_method: Post,
    preprocess_response: true,
    other_functions: {
        fn get_headers(
            &self,
            _req: &RouterData<Store, PaymentMethodStoreData>,
        ) -> CustomResult<Vec<(String, Maskable<String>)>, errors::ConnectorError> {
            self.soap_headers(transformers::sipp_action("TokeniseCreditCard").as_str())
        }

        fn get_url(
            &self,
            req: &RouterData<Store, PaymentMethodStoreData>,
        ) -> CustomResult<String, errors::ConnectorError> {
            Ok(format!("{}/sipp.asmx", self.connector_base_url(req)))
        }
    }
);
