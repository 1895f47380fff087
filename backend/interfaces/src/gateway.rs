use common_utils::{consts::DEFAULT_VERIFY_AMOUNT, CustomResult, MinorUnit};
use domain_types::{
    connector_flow::FlowName,
    connector_types::PaymentOptions,
    errors::ConnectorError,
    gateway_response::{AuthorizationToken, GatewayResponse, MultiResponse},
    payment_method_data::PaymentMethodData,
};
use error_stack::report;

/// Every vendor outcome, declines included, is `Ok`. `Err` is a fault found
/// before the vendor was contacted.
pub type GatewayResult = CustomResult<GatewayResponse, ConnectorError>;

pub type BoxedPaymentGateway = Box<dyn PaymentGateway>;

fn flow_not_supported(flow: FlowName, connector: &str) -> error_stack::Report<ConnectorError> {
    report!(ConnectorError::FlowNotSupported {
        flow: flow.to_string(),
        connector: connector.to_string(),
    })
}

/// Authorize [`DEFAULT_VERIFY_AMOUNT`] and void it again. The authorization
/// describes the result when both steps succeed; otherwise the failing step
/// does.
pub async fn verify_by_authorize_and_void<G>(
    gateway: &G,
    payment_method: &PaymentMethodData,
    options: &PaymentOptions,
) -> GatewayResult
where
    G: PaymentGateway + ?Sized,
{
    let verify_amount = MinorUnit::new(DEFAULT_VERIFY_AMOUNT);
    let mut responses = MultiResponse::new();

    let authorization = gateway
        .authorize(verify_amount, payment_method, options)
        .await?;
    let token = authorization
        .is_success()
        .then(|| authorization.authorization().cloned())
        .flatten();
    responses.push(authorization);

    if let Some(token) = token {
        let void_options = PaymentOptions {
            amount: Some(verify_amount),
            ..options.clone()
        };
        responses.push(gateway.void(&token, &void_options).await?);
    }

    responses
        .into_primary_response()
        .ok_or(report!(ConnectorError::ResponseHandlingFailed))
}

/// The normalized payment operations.
#[async_trait::async_trait]
pub trait PaymentGateway: Send + Sync {
    fn id(&self) -> &'static str;

    async fn purchase(
        &self,
        amount: MinorUnit,
        payment_method: &PaymentMethodData,
        options: &PaymentOptions,
    ) -> GatewayResult;

    async fn authorize(
        &self,
        amount: MinorUnit,
        payment_method: &PaymentMethodData,
        options: &PaymentOptions,
    ) -> GatewayResult;

    async fn capture(
        &self,
        amount: MinorUnit,
        authorization: &AuthorizationToken,
        options: &PaymentOptions,
    ) -> GatewayResult;

    async fn refund(
        &self,
        amount: MinorUnit,
        authorization: &AuthorizationToken,
        options: &PaymentOptions,
    ) -> GatewayResult;

    async fn void(
        &self,
        authorization: &AuthorizationToken,
        options: &PaymentOptions,
    ) -> GatewayResult;

    /// Authorize a nominal amount and void it again.
    async fn verify(
        &self,
        payment_method: &PaymentMethodData,
        options: &PaymentOptions,
    ) -> GatewayResult {
        verify_by_authorize_and_void(self, payment_method, options).await
    }

    async fn store(
        &self,
        _payment_method: &PaymentMethodData,
        _options: &PaymentOptions,
    ) -> GatewayResult {
        Err(flow_not_supported(FlowName::Store, self.id()))
    }

    async fn unstore(
        &self,
        _authorization: &AuthorizationToken,
        _options: &PaymentOptions,
    ) -> GatewayResult {
        Err(flow_not_supported(FlowName::Unstore, self.id()))
    }
}

#[cfg(test)]
mod tests {
    use std::{str::FromStr, sync::Mutex};

    use cards::{CardExpiration, CardNumber};
    use common_enums::StandardErrorCode;
    use domain_types::payment_method_data::Card;

    use super::*;

    #[derive(Default)]
    struct ScriptedGateway {
        approve_authorize: bool,
        approve_void: bool,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedGateway {
        fn record(&self, call: String) {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(call);
            }
        }

        fn respond(approved: bool, message: &str, token: &str) -> GatewayResult {
            Ok(if approved {
                GatewayResponse::builder(true, message)
                    .authorization(Some(AuthorizationToken::single(token)))
                    .build()
            } else {
                GatewayResponse::failure(message, StandardErrorCode::CardDeclined).build()
            })
        }
    }

    #[async_trait::async_trait]
    impl PaymentGateway for ScriptedGateway {
        fn id(&self) -> &'static str {
            "scripted"
        }

        async fn purchase(
            &self,
            amount: MinorUnit,
            _payment_method: &PaymentMethodData,
            _options: &PaymentOptions,
        ) -> GatewayResult {
            self.record(format!("purchase {amount}"));
            Self::respond(true, "Approved", "1")
        }

        async fn authorize(
            &self,
            amount: MinorUnit,
            _payment_method: &PaymentMethodData,
            _options: &PaymentOptions,
        ) -> GatewayResult {
            self.record(format!("authorize {amount}"));
            Self::respond(self.approve_authorize, "Authorized", "auth-1")
        }

        async fn capture(
            &self,
            _amount: MinorUnit,
            _authorization: &AuthorizationToken,
            _options: &PaymentOptions,
        ) -> GatewayResult {
            Self::respond(true, "Captured", "1")
        }

        async fn refund(
            &self,
            _amount: MinorUnit,
            _authorization: &AuthorizationToken,
            _options: &PaymentOptions,
        ) -> GatewayResult {
            Self::respond(true, "Refunded", "1")
        }

        async fn void(
            &self,
            authorization: &AuthorizationToken,
            options: &PaymentOptions,
        ) -> GatewayResult {
            self.record(format!(
                "void {authorization} {}",
                options.amount.map(|amount| amount.to_string()).unwrap_or_default()
            ));
            Self::respond(self.approve_void, "Voided", "void-1")
        }
    }

    fn card() -> PaymentMethodData {
        PaymentMethodData::Card(Card {
            number: CardNumber::from_str("4111111111111111").unwrap(),
            expiration: CardExpiration::new(9, 2035).unwrap(),
            cvc: None,
            first_name: None,
            last_name: None,
        })
    }

    #[tokio::test]
    async fn verify_authorizes_then_voids() {
        let gateway = ScriptedGateway {
            approve_authorize: true,
            approve_void: true,
            ..Default::default()
        };
        let response = gateway.verify(&card(), &PaymentOptions::default()).await.unwrap();
        assert!(response.is_success());
        assert_eq!(response.message(), "Authorized");
        assert_eq!(
            *gateway.calls.lock().unwrap(),
            vec!["authorize 100".to_string(), "void auth-1 100".to_string()]
        );
    }

    #[tokio::test]
    async fn verify_stops_at_declined_authorization() {
        let gateway = ScriptedGateway::default();
        let response = gateway.verify(&card(), &PaymentOptions::default()).await.unwrap();
        assert!(!response.is_success());
        assert_eq!(response.message(), "Authorized");
        assert_eq!(gateway.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn verify_reports_failed_void() {
        let gateway = ScriptedGateway {
            approve_authorize: true,
            ..Default::default()
        };
        let response = gateway.verify(&card(), &PaymentOptions::default()).await.unwrap();
        assert!(!response.is_success());
        assert_eq!(response.message(), "Voided");
        assert_eq!(response.error_code(), Some(StandardErrorCode::CardDeclined));
    }

    #[tokio::test]
    async fn store_is_unsupported_by_default() {
        let gateway = ScriptedGateway::default();
        let error = gateway
            .store(&card(), &PaymentOptions::default())
            .await
            .unwrap_err();
        assert_eq!(
            error.current_context(),
            &ConnectorError::FlowNotSupported {
                flow: "store".to_string(),
                connector: "scripted".to_string(),
            }
        );
        assert!(gateway
            .unstore(&AuthorizationToken::single("1"), &PaymentOptions::default())
            .await
            .is_err());
    }
}
