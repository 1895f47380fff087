use common_enums::{Currency, GatewayMode, StandardErrorCode};
use common_utils::{consts, MinorUnit};
use domain_types::{
    connector_flow::{Authorize, Capture, Flow, Purchase, Refund, Store, Unstore, Verify, Void},
    connector_types::{
        ConnectorEnum, PaymentMethodStoreData, PaymentMethodUnstoreData, PaymentOptions,
        PaymentVoidData, PaymentsAuthorizeData, PaymentsCaptureData, PaymentsVerifyData,
        RefundsData,
    },
    errors::ConnectorError,
    gateway_response::{AuthorizationToken, GatewayResponse},
    payment_method_data::PaymentMethodData,
    router_data::{ConnectorAuthType, RouterData},
    types::Connectors,
};
use external_services::service::execute_connector_processing_step;
use interfaces::{
    connector_integration::BoxedConnectorIntegration,
    gateway::{verify_by_authorize_and_void, BoxedPaymentGateway, GatewayResult, PaymentGateway},
    transport::BoxedConnectorTransport,
};

use crate::{connectors::BogusGateway, types::ConnectorData};

/// Build the gateway for `connector`. Bogus never leaves the process; every
/// other connector talks to its vendor through `transport`.
pub fn gateway_for(
    connector: ConnectorEnum,
    auth: ConnectorAuthType,
    connectors: Connectors,
    mode: GatewayMode,
    transport: BoxedConnectorTransport,
) -> BoxedPaymentGateway {
    match connector {
        ConnectorEnum::Bogus => Box::new(BogusGateway::new(mode)),
        ConnectorEnum::Bambora | ConnectorEnum::Bamboraapac | ConnectorEnum::Nmi => {
            Box::new(ConnectorGateway::new(
                ConnectorData::get_connector_by_name(&connector),
                auth,
                connectors,
                mode,
                transport,
            ))
        }
    }
}

/// [`PaymentGateway`] over a connector's flow integrations.
pub struct ConnectorGateway {
    connector_data: ConnectorData,
    auth: ConnectorAuthType,
    connectors: Connectors,
    mode: GatewayMode,
    transport: BoxedConnectorTransport,
}

impl ConnectorGateway {
    pub fn new(
        connector_data: ConnectorData,
        auth: ConnectorAuthType,
        connectors: Connectors,
        mode: GatewayMode,
        transport: BoxedConnectorTransport,
    ) -> Self {
        Self {
            connector_data,
            auth,
            connectors,
            mode,
            transport,
        }
    }

    pub fn connector_name(&self) -> ConnectorEnum {
        self.connector_data.connector_name
    }

    fn currency(&self, options: &PaymentOptions) -> Currency {
        options.currency_or(self.connector_data.connector.default_currency())
    }

    /// Check the card before anything is sent. An expired card is answered with
    /// a failed response; a network the vendor cannot take is an error.
    fn screen_payment_method(
        &self,
        payment_method: &PaymentMethodData,
    ) -> Result<Option<GatewayResponse>, error_stack::Report<ConnectorError>> {
        let Some(card) = payment_method.get_card() else {
            return Ok(None);
        };
        if card.is_expired()? {
            tracing::info!(
                connector = %self.connector_data.connector_name,
                "card expired, not sending the request"
            );
            return Ok(Some(
                GatewayResponse::failure(
                    consts::EXPIRED_CARD_MESSAGE,
                    StandardErrorCode::ExpiredCard,
                )
                .test_unless_set(self.mode.is_test())
                .build(),
            ));
        }
        match card.get_card_network() {
            Some(network) if !self.connector_data.connector.supports_card_network(network) => {
                Err(ConnectorError::NotSupported {
                    message: format!("{network} cards"),
                    connector: self.connector_data.connector.display_name(),
                }
                .into())
            }
            _ => Ok(None),
        }
    }

    async fn execute<F: Flow, Req: Send + Sync + 'static>(
        &self,
        integration: BoxedConnectorIntegration<'_, F, Req>,
        request: Req,
    ) -> GatewayResult {
        let router_data: RouterData<F, Req> = RouterData::new(
            request,
            self.auth.clone(),
            self.connectors.clone(),
            self.mode,
        );
        tracing::debug!(
            connector = %self.connector_data.connector_name,
            flow = %F::NAME,
            auth_type = self.auth.auth_type_name(),
            "executing gateway operation"
        );
        execute_connector_processing_step(self.transport.as_ref(), *integration, &router_data)
            .await
    }

    fn authorize_data(
        &self,
        amount: MinorUnit,
        payment_method: &PaymentMethodData,
        options: &PaymentOptions,
    ) -> PaymentsAuthorizeData {
        PaymentsAuthorizeData {
            amount,
            currency: self.currency(options),
            payment_method: payment_method.clone(),
            options: options.clone(),
        }
    }
}

#[async_trait::async_trait]
impl PaymentGateway for ConnectorGateway {
    fn id(&self) -> &'static str {
        self.connector_data.connector.id()
    }

    async fn purchase(
        &self,
        amount: MinorUnit,
        payment_method: &PaymentMethodData,
        options: &PaymentOptions,
    ) -> GatewayResult {
        if let Some(response) = self.screen_payment_method(payment_method)? {
            return Ok(response);
        }
        let request = self.authorize_data(amount, payment_method, options);
        let integration: BoxedConnectorIntegration<'_, Purchase, PaymentsAuthorizeData> =
            self.connector_data.connector.get_connector_integration();
        self.execute(integration, request).await
    }

    async fn authorize(
        &self,
        amount: MinorUnit,
        payment_method: &PaymentMethodData,
        options: &PaymentOptions,
    ) -> GatewayResult {
        if let Some(response) = self.screen_payment_method(payment_method)? {
            return Ok(response);
        }
        let request = self.authorize_data(amount, payment_method, options);
        let integration: BoxedConnectorIntegration<'_, Authorize, PaymentsAuthorizeData> =
            self.connector_data.connector.get_connector_integration();
        self.execute(integration, request).await
    }

    async fn capture(
        &self,
        amount: MinorUnit,
        authorization: &AuthorizationToken,
        options: &PaymentOptions,
    ) -> GatewayResult {
        let request = PaymentsCaptureData {
            amount,
            currency: self.currency(options),
            authorization: authorization.clone(),
            options: options.clone(),
        };
        let integration: BoxedConnectorIntegration<'_, Capture, PaymentsCaptureData> =
            self.connector_data.connector.get_connector_integration();
        self.execute(integration, request).await
    }

    async fn refund(
        &self,
        amount: MinorUnit,
        authorization: &AuthorizationToken,
        options: &PaymentOptions,
    ) -> GatewayResult {
        let request = RefundsData {
            amount,
            currency: self.currency(options),
            authorization: authorization.clone(),
            options: options.clone(),
        };
        let integration: BoxedConnectorIntegration<'_, Refund, RefundsData> =
            self.connector_data.connector.get_connector_integration();
        self.execute(integration, request).await
    }

    async fn void(
        &self,
        authorization: &AuthorizationToken,
        options: &PaymentOptions,
    ) -> GatewayResult {
        let request = PaymentVoidData {
            authorization: authorization.clone(),
            options: options.clone(),
        };
        let integration: BoxedConnectorIntegration<'_, Void, PaymentVoidData> =
            self.connector_data.connector.get_connector_integration();
        self.execute(integration, request).await
    }

    async fn verify(
        &self,
        payment_method: &PaymentMethodData,
        options: &PaymentOptions,
    ) -> GatewayResult {
        if !self.connector_data.connector.should_do_native_verify() {
            return verify_by_authorize_and_void(self, payment_method, options).await;
        }
        if let Some(response) = self.screen_payment_method(payment_method)? {
            return Ok(response);
        }
        let request = PaymentsVerifyData {
            currency: self.currency(options),
            payment_method: payment_method.clone(),
            options: options.clone(),
        };
        let integration: BoxedConnectorIntegration<'_, Verify, PaymentsVerifyData> =
            self.connector_data.connector.get_connector_integration();
        self.execute(integration, request).await
    }

    async fn store(
        &self,
        payment_method: &PaymentMethodData,
        options: &PaymentOptions,
    ) -> GatewayResult {
        if let Some(response) = self.screen_payment_method(payment_method)? {
            return Ok(response);
        }
        let request = PaymentMethodStoreData {
            payment_method: payment_method.clone(),
            options: options.clone(),
        };
        let integration: BoxedConnectorIntegration<'_, Store, PaymentMethodStoreData> =
            self.connector_data.connector.get_connector_integration();
        self.execute(integration, request).await
    }

    async fn unstore(
        &self,
        authorization: &AuthorizationToken,
        options: &PaymentOptions,
    ) -> GatewayResult {
        let request = PaymentMethodUnstoreData {
            authorization: authorization.clone(),
            options: options.clone(),
        };
        let integration: BoxedConnectorIntegration<'_, Unstore, PaymentMethodUnstoreData> =
            self.connector_data.connector.get_connector_integration();
        self.execute(integration, request).await
    }
}
