use bytes::Bytes;
use common_utils::{
    errors::CustomResult,
    ext_traits::{BytesExt, UrlEncodedExt, XmlExt},
};
use domain_types::errors;
use error_stack::ResultExt;
use serde::de::DeserializeOwned;

/// Request bodies that render a complete SOAP envelope.
pub trait GetSoapXml {
    fn to_soap_xml(&self) -> CustomResult<String, errors::ConnectorError>;
}

pub(crate) fn parse_json_body<T: DeserializeOwned>(
    bytes: &Bytes,
    type_name: &'static str,
) -> CustomResult<T, errors::ConnectorError> {
    bytes
        .parse_struct(type_name)
        .change_context(errors::ConnectorError::ResponseDeserializationFailed)
}

pub(crate) fn parse_form_body<T: DeserializeOwned>(
    bytes: &Bytes,
    type_name: &'static str,
) -> CustomResult<T, errors::ConnectorError> {
    bytes
        .parse_urlencoded(type_name)
        .change_context(errors::ConnectorError::ResponseDeserializationFailed)
}

pub(crate) fn parse_xml_body<T: DeserializeOwned>(
    bytes: &Bytes,
    type_name: &'static str,
) -> CustomResult<T, errors::ConnectorError> {
    let text = std::str::from_utf8(bytes)
        .change_context(errors::ConnectorError::ResponseDeserializationFailed)?;
    text.parse_xml(type_name)
        .change_context(errors::ConnectorError::ResponseDeserializationFailed)
}

macro_rules! expand_request_content {
    (Json, $connector_req: ident) => {
        error_stack::ResultExt::change_context(
            common_utils::request::RequestContent::json(&$connector_req),
            domain_types::errors::ConnectorError::RequestEncodingFailed,
        )
    };
    (FormUrlEncoded, $connector_req: ident) => {
        error_stack::ResultExt::change_context(
            common_utils::request::RequestContent::form_urlencoded(&$connector_req),
            domain_types::errors::ConnectorError::RequestEncodingFailed,
        )
    };
    (SoapXml, $connector_req: ident) => {
        $crate::connectors::macros::GetSoapXml::to_soap_xml(&$connector_req)
            .map(common_utils::request::RequestContent::Xml)
    };
}

macro_rules! expand_response_parser {
    (Json, $bytes: expr, $response_body: ty) => {
        $crate::connectors::macros::parse_json_body::<$response_body>(
            &$bytes,
            stringify!($response_body),
        )
    };
    (FormUrlEncoded, $bytes: expr, $response_body: ty) => {
        $crate::connectors::macros::parse_form_body::<$response_body>(
            &$bytes,
            stringify!($response_body),
        )
    };
    (Xml, $bytes: expr, $response_body: ty) => {
        $crate::connectors::macros::parse_xml_body::<$response_body>(
            &$bytes,
            stringify!($response_body),
        )
    };
}

macro_rules! expand_fn_get_headers {
    ($flow: ident, $request: ty) => {
        fn get_headers(
            &self,
            req: &domain_types::router_data::RouterData<$flow, $request>,
        ) -> common_utils::CustomResult<
            Vec<(String, hyperswitch_masking::Maskable<String>)>,
            domain_types::errors::ConnectorError,
        > {
            self.build_headers(req)
        }
    };
}

macro_rules! expand_fn_get_content_type {
    () => {
        fn get_content_type(&self) -> &'static str {
            interfaces::api::ConnectorCommon::common_get_content_type(self)
        }
    };
}

macro_rules! expand_fn_get_error_response {
    () => {
        fn get_error_response(
            &self,
            res: domain_types::router_response_types::Response,
        ) -> common_utils::CustomResult<
            domain_types::gateway_response::GatewayResponseBuilder,
            domain_types::errors::ConnectorError,
        > {
            Ok(interfaces::api::ConnectorCommon::build_error_response(self, res)?
                .into_gateway_response())
        }
    };
}

macro_rules! expand_default_functions {
    (function: get_headers, flow_name: $flow: ident, flow_request: $request: ty) => {
        $crate::connectors::macros::expand_fn_get_headers!($flow, $request);
    };
    (function: get_content_type, flow_name: $flow: ident, flow_request: $request: ty) => {
        $crate::connectors::macros::expand_fn_get_content_type!();
    };
    (function: get_error_response, flow_name: $flow: ident, flow_request: $request: ty) => {
        $crate::connectors::macros::expand_fn_get_error_response!();
    };
}

/// Declares the connector struct with `new()` and the helpers shared by its
/// flows.
macro_rules! create_all_prerequisites {
    (
        connector_name: $connector: ident,
        member_functions: {
            $($member_function: item)*
        } $(,)?
    ) => {
        #[derive(Clone)]
        pub struct $connector;

        impl $connector {
            pub const fn new() -> &'static Self {
                &Self
            }

            $($member_function)*
        }
    };
}

/// Implements one flow: request body through `TryFrom<&RouterData>`, response
/// body parsed by wire format and turned into a [`GatewayResponseBuilder`]
/// through `TryFrom<ResponseRouterData>`.
///
/// [`GatewayResponseBuilder`]: domain_types::gateway_response::GatewayResponseBuilder
macro_rules! macro_connector_implementation {
    (
        connector_default_implementations: [$($function_name: ident),* $(,)?],
        connector: $connector: ident,
        $(curl_request: $content_type: ident($request_body: ty),)?
        curl_response: $response_format: ident($response_body: ty),
        flow_name: $flow: ident,
        flow_request: $request: ty,
        http_method: $http_method: ident,
        $(preprocess_response: $preprocess_response: literal,)?
        other_functions: {
            $($function_def: tt)*
        } $(,)?
    ) => {
        impl interfaces::connector_integration::ConnectorIntegration<$flow, $request> for $connector {
            fn get_http_method(&self) -> common_utils::request::Method {
                common_utils::request::Method::$http_method
            }

            $(
                fn get_request_body(
                    &self,
                    req: &domain_types::router_data::RouterData<$flow, $request>,
                ) -> common_utils::CustomResult<
                    Option<common_utils::request::RequestContent>,
                    domain_types::errors::ConnectorError,
                > {
                    let connector_req = <$request_body>::try_from(req)?;
                    $crate::connectors::macros::expand_request_content!($content_type, connector_req)
                        .map(Some)
                }
            )?

            fn handle_response(
                &self,
                data: &domain_types::router_data::RouterData<$flow, $request>,
                res: domain_types::router_response_types::Response,
            ) -> common_utils::CustomResult<
                domain_types::gateway_response::GatewayResponseBuilder,
                domain_types::errors::ConnectorError,
            > {
                let bytes = res.response;
                $(
                    let bytes = if $preprocess_response {
                        self.preprocess_response_bytes(bytes)?
                    } else {
                        bytes
                    };
                )?
                let response: $response_body =
                    $crate::connectors::macros::expand_response_parser!($response_format, bytes, $response_body)?;
                domain_types::gateway_response::GatewayResponseBuilder::try_from(
                    $crate::types::ResponseRouterData {
                        response,
                        router_data: data,
                        http_code: res.status_code,
                    },
                )
            }

            $(
                $crate::connectors::macros::expand_default_functions!(
                    function: $function_name,
                    flow_name: $flow,
                    flow_request: $request
                );
            )*

            $($function_def)*
        }
    };
}

pub(crate) use create_all_prerequisites;
pub(crate) use expand_default_functions;
pub(crate) use expand_fn_get_content_type;
pub(crate) use expand_fn_get_error_response;
pub(crate) use expand_fn_get_headers;
pub(crate) use expand_request_content;
pub(crate) use expand_response_parser;
pub(crate) use macro_connector_implementation;
