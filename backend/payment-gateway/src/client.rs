//! Configured entry point to one gateway.

use std::sync::Arc;

use common_utils::MinorUnit;
use connector_integration::gateway_for;
use domain_types::{
    connector_types::PaymentOptions, gateway_response::AuthorizationToken,
    payment_method_data::PaymentMethodData, types::Connectors,
};
use external_services::HttpTransport;
use interfaces::{
    gateway::{BoxedPaymentGateway, GatewayResult},
    transport::BoxedConnectorTransport,
};

use crate::{
    configs::{Config, GatewaySettings},
    error::ConfigurationError,
};

/// Runs the normalized operations against the configured gateway and logs
/// each outcome.
pub struct GatewayClient {
    gateway: BoxedPaymentGateway,
}

impl GatewayClient {
    pub fn new(gateway: BoxedPaymentGateway) -> Self {
        Self { gateway }
    }

    /// Client talking to vendors over HTTP, through the configured proxy.
    pub fn from_config(config: &Config) -> Result<Self, ConfigurationError> {
        let transport: BoxedConnectorTransport = Arc::new(HttpTransport::new(config.proxy.clone()));
        Self::with_transport(&config.gateway, &config.connectors, transport)
    }

    pub fn with_transport(
        settings: &GatewaySettings,
        connectors: &Connectors,
        transport: BoxedConnectorTransport,
    ) -> Result<Self, ConfigurationError> {
        let connector = settings.connector()?;
        tracing::info!(
            connector = %connector,
            mode = %settings.mode,
            auth = ?settings.auth.get_masked_keys(),
            "gateway configured"
        );
        Ok(Self::new(gateway_for(
            connector,
            settings.auth.clone(),
            connectors.clone(),
            settings.mode,
            transport,
        )))
    }

    pub fn connector_id(&self) -> &'static str {
        self.gateway.id()
    }

    #[tracing::instrument(
        skip_all,
        fields(connector = self.gateway.id(), amount = amount.get_amount_as_i64())
    )]
    pub async fn purchase(
        &self,
        amount: MinorUnit,
        payment_method: &PaymentMethodData,
        options: &PaymentOptions,
    ) -> GatewayResult {
        log_outcome(self.gateway.purchase(amount, payment_method, options).await)
    }

    #[tracing::instrument(
        skip_all,
        fields(connector = self.gateway.id(), amount = amount.get_amount_as_i64())
    )]
    pub async fn authorize(
        &self,
        amount: MinorUnit,
        payment_method: &PaymentMethodData,
        options: &PaymentOptions,
    ) -> GatewayResult {
        log_outcome(self.gateway.authorize(amount, payment_method, options).await)
    }

    #[tracing::instrument(
        skip_all,
        fields(connector = self.gateway.id(), amount = amount.get_amount_as_i64())
    )]
    pub async fn capture(
        &self,
        amount: MinorUnit,
        authorization: &AuthorizationToken,
        options: &PaymentOptions,
    ) -> GatewayResult {
        log_outcome(self.gateway.capture(amount, authorization, options).await)
    }

    #[tracing::instrument(
        skip_all,
        fields(connector = self.gateway.id(), amount = amount.get_amount_as_i64())
    )]
    pub async fn refund(
        &self,
        amount: MinorUnit,
        authorization: &AuthorizationToken,
        options: &PaymentOptions,
    ) -> GatewayResult {
        log_outcome(self.gateway.refund(amount, authorization, options).await)
    }

    #[tracing::instrument(skip_all, fields(connector = self.gateway.id()))]
    pub async fn void(
        &self,
        authorization: &AuthorizationToken,
        options: &PaymentOptions,
    ) -> GatewayResult {
        log_outcome(self.gateway.void(authorization, options).await)
    }

    #[tracing::instrument(skip_all, fields(connector = self.gateway.id()))]
    pub async fn verify(
        &self,
        payment_method: &PaymentMethodData,
        options: &PaymentOptions,
    ) -> GatewayResult {
        log_outcome(self.gateway.verify(payment_method, options).await)
    }

    #[tracing::instrument(skip_all, fields(connector = self.gateway.id()))]
    pub async fn store(
        &self,
        payment_method: &PaymentMethodData,
        options: &PaymentOptions,
    ) -> GatewayResult {
        log_outcome(self.gateway.store(payment_method, options).await)
    }

    #[tracing::instrument(skip_all, fields(connector = self.gateway.id()))]
    pub async fn unstore(
        &self,
        authorization: &AuthorizationToken,
        options: &PaymentOptions,
    ) -> GatewayResult {
        log_outcome(self.gateway.unstore(authorization, options).await)
    }
}

fn log_outcome(result: GatewayResult) -> GatewayResult {
    match &result {
        Ok(response) if response.is_success() => {
            let authorization = response.authorization().map(ToString::to_string);
            tracing::info!(
                message = response.message(),
                authorization = authorization.as_deref(),
                "operation succeeded"
            )
        }
        Ok(response) => {
            let error_code = response.error_code().map(|code| code.to_string());
            tracing::warn!(
                message = response.message(),
                error_code = error_code.as_deref(),
                "operation failed"
            )
        }
        Err(error) => tracing::error!(?error, "operation rejected"),
    }
    result
}
