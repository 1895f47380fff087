use common_enums::{CardNetwork, CountryAlpha2, Currency, GatewayMode, MoneyFormat};
use common_utils::{consts, CustomResult, MinorUnit};
use domain_types::{
    errors::ConnectorError,
    router_data::{ConnectorAuthType, ErrorResponse},
    router_response_types::Response,
    types::Connectors,
};
use hyperswitch_masking::Maskable;

/// Static facts about a gateway and the pieces shared by all of its flows.
pub trait ConnectorCommon {
    /// Name of the connector, as used in configuration and logs.
    fn id(&self) -> &'static str;

    fn display_name(&self) -> &'static str;

    fn homepage_url(&self) -> &'static str;

    fn supported_countries(&self) -> &'static [CountryAlpha2];

    fn supported_card_networks(&self) -> &'static [CardNetwork];

    fn default_currency(&self) -> Currency {
        Currency::USD
    }

    /// How amounts are written on the wire.
    fn money_format(&self) -> MoneyFormat {
        MoneyFormat::Dollars
    }

    /// HTTP `Content-Type`.
    fn common_get_content_type(&self) -> &'static str {
        "application/json"
    }

    /// The base URL for interacting with the connector's API.
    fn base_url<'a>(&self, connectors: &'a Connectors, mode: GatewayMode) -> &'a str;

    fn get_auth_header(
        &self,
        _auth_type: &ConnectorAuthType,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, ConnectorError> {
        Ok(Vec::new())
    }

    /// Parse a non-2xx body into the vendor's error shape.
    fn build_error_response(&self, res: Response) -> CustomResult<ErrorResponse, ConnectorError>;

    /// Message on the failed response returned for a body that could not be parsed.
    fn unparsable_response_message(&self) -> &'static str {
        consts::INVALID_RESPONSE_MESSAGE
    }

    fn amount(&self, money: MinorUnit) -> String {
        common_utils::amount(money, self.money_format())
    }

    fn localized_amount(&self, money: MinorUnit, currency: Currency) -> String {
        common_utils::localized_amount(money, currency, self.money_format())
    }

    fn supports_card_network(&self, network: CardNetwork) -> bool {
        self.supported_card_networks().contains(&network)
    }
}
