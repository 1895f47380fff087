use common_enums::StandardErrorCode;
use common_utils::{errors::ParsingError, AmountConvertor, CustomResult, MinorUnit};
use error_stack::{report, ResultExt};
use serde::Serialize;
use serde_json::Value;

use crate::{
    errors,
    gateway_response::{GatewayResponse, GatewayResponseBuilder},
    router_response_types::Response,
};

pub type Error = error_stack::Report<errors::ConnectorError>;

/// Trait for converting from one foreign type to another
pub trait ForeignTryFrom<F>: Sized {
    /// Custom error for conversion failure
    type Error;

    /// Convert from a foreign type to the current type and return an error if the conversion fails
    fn foreign_try_from(from: F) -> Result<Self, Self::Error>;
}

pub trait ForeignFrom<F>: Sized {
    /// Convert from a foreign type to the current type
    fn foreign_from(from: F) -> Self;
}

pub trait Encode<'e>
where
    Self: 'e + std::fmt::Debug,
{
    fn encode_to_value(&'e self) -> CustomResult<Value, ParsingError>
    where
        Self: Serialize;
}

impl<'e, A> Encode<'e> for A
where
    Self: 'e + std::fmt::Debug,
{
    fn encode_to_value(&'e self) -> CustomResult<Value, ParsingError>
    where
        Self: Serialize,
    {
        serde_json::to_value(self)
            .change_context(ParsingError::EncodeError("json-value"))
            .attach_printable_lazy(|| format!("Unable to convert {self:?} to a value"))
    }
}

/// Failed response for a body the connector could not parse. The raw body is
/// kept under the `body` param.
pub fn handle_response_deserialization_failure(
    res: &Response,
    message: &str,
) -> GatewayResponseBuilder {
    let body = res.body_as_text();
    tracing::warn!(
        status_code = res.status_code,
        body_length = body.len(),
        "unparsable connector response"
    );
    GatewayResponse::failure(message, StandardErrorCode::UnparsableResponse)
        .param("body", body)
        .param("status_code", res.status_code.to_string())
}

pub fn missing_field_err(
    message: &'static str,
) -> Box<dyn Fn() -> error_stack::Report<errors::ConnectorError> + 'static> {
    Box::new(move || {
        errors::ConnectorError::MissingRequiredField {
            field_name: message,
        }
        .into()
    })
}

pub const SELECTED_PAYMENT_METHOD: &str = "Selected payment method";

pub fn get_unimplemented_payment_method_error_message(connector: &str) -> String {
    format!("{SELECTED_PAYMENT_METHOD} through {connector}")
}

pub fn construct_not_supported_error_report(
    payment_method: &str,
    connector_name: &'static str,
) -> error_stack::Report<errors::ConnectorError> {
    errors::ConnectorError::NotSupported {
        message: payment_method.to_string(),
        connector: connector_name,
    }
    .into()
}

pub fn get_http_header<'a>(
    key: &str,
    headers: &'a http::HeaderMap,
) -> CustomResult<&'a str, errors::ConnectorError> {
    headers
        .get(key)
        .ok_or(report!(errors::ConnectorError::ResponseHandlingFailed))
        .attach_printable_lazy(|| format!("missing header {key}"))?
        .to_str()
        .change_context(errors::ConnectorError::ResponseHandlingFailed)
}

pub fn convert_amount<T>(
    amount_convertor: &dyn AmountConvertor<Output = T>,
    amount: MinorUnit,
    currency: common_enums::Currency,
) -> Result<T, Error> {
    amount_convertor
        .convert(amount, currency)
        .change_context(errors::ConnectorError::AmountConversionFailed)
}

pub fn convert_back_amount_to_minor_units<T>(
    amount_convertor: &dyn AmountConvertor<Output = T>,
    amount: T,
    currency: common_enums::Currency,
) -> Result<MinorUnit, Error> {
    amount_convertor
        .convert_back(amount, currency)
        .change_context(errors::ConnectorError::AmountConversionFailed)
}

#[cfg(test)]
mod tests {
    use common_enums::Currency;
    use common_utils::{StringMajorUnitForConnector, StringMinorUnitForConnector};

    use super::*;

    #[test]
    fn unparsable_body_becomes_failed_response() {
        let response = handle_response_deserialization_failure(
            &Response::new(200, "<html>Service Unavailable</html>"),
            "Invalid response received from the API",
        )
        .build();
        assert!(!response.is_success());
        assert_eq!(response.error_code(), Some(StandardErrorCode::UnparsableResponse));
        assert_eq!(response.param("body"), Some("<html>Service Unavailable</html>"));
    }

    #[test]
    fn amounts_are_converted_for_the_connector() {
        let amount = convert_amount(
            &StringMajorUnitForConnector,
            MinorUnit::new(1050),
            Currency::CAD,
        )
        .unwrap();
        assert_eq!(amount.get_amount_as_string(), "10.50");

        let amount =
            convert_amount(&StringMinorUnitForConnector, MinorUnit::new(100), Currency::JPY)
                .unwrap();
        assert_eq!(amount.to_string(), "1");
        let back =
            convert_back_amount_to_minor_units(&StringMinorUnitForConnector, amount, Currency::JPY)
                .unwrap();
        assert_eq!(back, MinorUnit::new(100));
    }

    #[test]
    fn missing_header_is_an_error() {
        let headers = http::HeaderMap::new();
        assert!(get_http_header("content-type", &headers).is_err());
    }
}
