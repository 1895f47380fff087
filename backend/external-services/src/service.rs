use common_enums::StandardErrorCode;
use common_utils::{request::Headers, CustomResult};
use domain_types::{
    connector_flow::Flow,
    errors::{ApiClientError, ConnectorError},
    gateway_response::{GatewayResponse, GatewayResponseBuilder},
    router_data::RouterData,
    utils::handle_response_deserialization_failure,
};
use hyperswitch_masking::Maskable;
use interfaces::{
    connector_integration::ConnectorIntegration, transport::ConnectorTransport,
};
use serde_json::{json, Value};
use tracing::field::Empty;

/// Build the request for one flow, send it and turn whatever comes back into a
/// [`GatewayResponse`].
///
/// Only failures while building the request are returned as errors. HTTP
/// error statuses, bodies that cannot be parsed and transport failures all
/// become failed responses.
#[tracing::instrument(
    name = "execute_connector_processing_step",
    skip_all,
    fields(
        connector = connector.id(),
        flow = %F::NAME,
        request.headers = Empty,
        request.url = Empty,
        request.method = Empty,
        response.error_message = Empty,
        response.status_code = Empty,
        latency = Empty,
    )
)]
pub async fn execute_connector_processing_step<F, Req>(
    transport: &dyn ConnectorTransport,
    connector: &dyn ConnectorIntegration<F, Req>,
    router_data: &RouterData<F, Req>,
) -> CustomResult<GatewayResponse, ConnectorError>
where
    F: Flow,
    Req: Send + Sync + 'static,
{
    let start = tokio::time::Instant::now();
    let request = connector.build_request(router_data)?;

    let headers_for_logging = masked_headers(&request.headers);
    tracing::Span::current().record(
        "request.headers",
        tracing::field::display(&headers_for_logging),
    );
    tracing::Span::current().record("request.url", tracing::field::display(&request.url));
    tracing::Span::current().record("request.method", tracing::field::display(request.method));
    tracing::info!(body = ?request.body, "request of connector");

    let response = transport.send(request).await;

    let response = match response {
        Ok(Ok(body)) => {
            tracing::Span::current()
                .record("response.status_code", tracing::field::display(body.status_code));
            connector
                .handle_response(router_data, body.clone())
                .unwrap_or_else(|error| {
                    tracing::error!(?error, "failed to handle connector response");
                    handle_response_deserialization_failure(
                        &body,
                        connector.unparsable_response_message(),
                    )
                })
        }
        Ok(Err(body)) => {
            tracing::Span::current()
                .record("response.status_code", tracing::field::display(body.status_code));
            connector
                .get_error_response(body.clone())
                .unwrap_or_else(|error| {
                    tracing::error!(?error, "failed to parse connector error response");
                    handle_response_deserialization_failure(
                        &body,
                        connector.unparsable_response_message(),
                    )
                })
        }
        Err(error) => {
            info_log(
                "NETWORK_ERROR",
                &json!(format!(
                    "Failed getting response from connector. Error: {:?}",
                    error
                )),
            );
            transport_failure(error.current_context())
        }
    };

    let response = response
        .test_unless_set(router_data.gateway_mode.is_test())
        .build();
    if !response.is_success() {
        tracing::Span::current().record(
            "response.error_message",
            tracing::field::display(response.message()),
        );
    }

    let elapsed = start.elapsed().as_millis();
    tracing::Span::current().record("latency", elapsed);
    tracing::info!(
        tag = "OutgoingApi",
        log_type = "api",
        success = response.is_success(),
        "Outgoing Request completed"
    );
    Ok(response)
}

/// Failed response for a request that never got a usable answer.
pub fn transport_failure(error: &ApiClientError) -> GatewayResponseBuilder {
    let message = if error.is_upstream_timeout() {
        "The connection to the remote server timed out".to_string()
    } else if error.is_connection_closed_before_message_could_complete() {
        "The connection to the remote server was reset".to_string()
    } else {
        format!("Unable to reach the remote server: {error}")
    };
    GatewayResponse::failure(message, StandardErrorCode::ProcessingError)
}

fn masked_headers(headers: &Headers) -> Value {
    let masked = headers
        .iter()
        .fold(serde_json::Map::new(), |mut acc, (key, value)| {
            let value = match value {
                Maskable::Masked(_) => {
                    Value::String("*** alloc::string::String ***".to_string())
                }
                Maskable::Normal(value) => Value::String(value.to_owned()),
            };
            acc.insert(key.clone(), value);
            acc
        });
    Value::Object(masked)
}

#[inline]
pub fn info_log(action: &str, message: &Value) {
    tracing::info!(tags = %action, json_value= %message);
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use common_enums::{CardNetwork, CountryAlpha2, GatewayMode};
    use common_utils::{
        ext_traits::BytesExt,
        request::{Request, RequestContent},
    };
    use domain_types::{
        connector_flow::{Capture, Store},
        router_data::{ConnectorAuthType, ErrorResponse},
        router_response_types::Response,
        types::Connectors,
    };
    use error_stack::ResultExt;
    use hyperswitch_masking::Mask;
    use interfaces::api::ConnectorCommon;

    use super::*;

    struct EchoConnector;

    #[derive(serde::Deserialize)]
    struct EchoResponse {
        approved: bool,
        message: String,
    }

    #[derive(serde::Deserialize)]
    struct EchoError {
        message: String,
    }

    impl ConnectorCommon for EchoConnector {
        fn id(&self) -> &'static str {
            "echo"
        }

        fn display_name(&self) -> &'static str {
            "Echo"
        }

        fn homepage_url(&self) -> &'static str {
            "https://echo.example.com"
        }

        fn supported_countries(&self) -> &'static [CountryAlpha2] {
            &[CountryAlpha2::US]
        }

        fn supported_card_networks(&self) -> &'static [CardNetwork] {
            &[CardNetwork::Visa]
        }

        fn base_url<'a>(&self, connectors: &'a Connectors, mode: GatewayMode) -> &'a str {
            connectors.bogus.base_url_for(mode)
        }

        fn build_error_response(
            &self,
            res: Response,
        ) -> CustomResult<ErrorResponse, ConnectorError> {
            let response: EchoError = res
                .response
                .parse_struct("EchoError")
                .change_context(ConnectorError::ResponseDeserializationFailed)?;
            Ok(ErrorResponse {
                message: response.message,
                status_code: res.status_code,
                standard_error_code: StandardErrorCode::CardDeclined,
                ..Default::default()
            })
        }
    }

    impl ConnectorIntegration<Capture, String> for EchoConnector {
        fn get_url(
            &self,
            req: &RouterData<Capture, String>,
        ) -> CustomResult<String, ConnectorError> {
            Ok(format!("https://echo.example.com/capture/{}", req.request))
        }

        fn get_request_body(
            &self,
            req: &RouterData<Capture, String>,
        ) -> CustomResult<Option<RequestContent>, ConnectorError> {
            Ok(Some(RequestContent::Json(format!("{{\"id\":\"{}\"}}", req.request))))
        }

        fn handle_response(
            &self,
            _data: &RouterData<Capture, String>,
            res: Response,
        ) -> CustomResult<GatewayResponseBuilder, ConnectorError> {
            let response: EchoResponse = res
                .response
                .parse_struct("EchoResponse")
                .change_context(ConnectorError::ResponseDeserializationFailed)?;
            Ok(GatewayResponse::builder(response.approved, response.message))
        }
    }

    impl ConnectorIntegration<Store, String> for EchoConnector {}

    struct MockTransport {
        reply: Mutex<Option<CustomResult<Result<Response, Response>, ApiClientError>>>,
        sent: Mutex<Vec<String>>,
    }

    impl MockTransport {
        fn replying(reply: CustomResult<Result<Response, Response>, ApiClientError>) -> Self {
            Self {
                reply: Mutex::new(Some(reply)),
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl ConnectorTransport for MockTransport {
        async fn send(
            &self,
            request: Request,
        ) -> CustomResult<Result<Response, Response>, ApiClientError> {
            self.sent.lock().unwrap().push(request.url.clone());
            self.reply
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| {
                    Err(ApiClientError::RequestNotSent("no reply queued".to_string()).into())
                })
        }
    }

    fn router_data<F>(request: &str) -> RouterData<F, String> {
        RouterData::new(
            request.to_string(),
            ConnectorAuthType::NoKey,
            Connectors::default(),
            GatewayMode::Test,
        )
    }

    #[tokio::test]
    async fn successful_body_is_handled_by_the_connector() {
        let transport = MockTransport::replying(Ok(Ok(Response::new(
            200,
            r#"{"approved":true,"message":"Approved"}"#,
        ))));
        let response = execute_connector_processing_step(
            &transport,
            &EchoConnector,
            &router_data::<Capture>("42"),
        )
        .await
        .unwrap();
        assert!(response.is_success());
        assert_eq!(response.message(), "Approved");
        assert!(response.is_test());
        assert_eq!(
            *transport.sent.lock().unwrap(),
            vec!["https://echo.example.com/capture/42".to_string()]
        );
    }

    #[tokio::test]
    async fn error_status_becomes_failed_response() {
        let transport = MockTransport::replying(Ok(Err(Response::new(
            402,
            r#"{"message":"DECLINE"}"#,
        ))));
        let response = execute_connector_processing_step(
            &transport,
            &EchoConnector,
            &router_data::<Capture>("42"),
        )
        .await
        .unwrap();
        assert!(!response.is_success());
        assert_eq!(response.message(), "DECLINE");
        assert_eq!(response.error_code(), Some(StandardErrorCode::CardDeclined));
    }

    #[tokio::test]
    async fn unparsable_body_becomes_failed_response() {
        let transport =
            MockTransport::replying(Ok(Ok(Response::new(200, "<html>oops</html>"))));
        let response = execute_connector_processing_step(
            &transport,
            &EchoConnector,
            &router_data::<Capture>("42"),
        )
        .await
        .unwrap();
        assert!(!response.is_success());
        assert_eq!(response.error_code(), Some(StandardErrorCode::UnparsableResponse));
        assert_eq!(response.param("body"), Some("<html>oops</html>"));
    }

    #[tokio::test]
    async fn transport_errors_become_failed_response() {
        let transport =
            MockTransport::replying(Err(ApiClientError::RequestTimeoutReceived.into()));
        let response = execute_connector_processing_step(
            &transport,
            &EchoConnector,
            &router_data::<Capture>("42"),
        )
        .await
        .unwrap();
        assert!(!response.is_success());
        assert_eq!(response.error_code(), Some(StandardErrorCode::ProcessingError));
        assert!(response.message().contains("timed out"));
    }

    #[tokio::test]
    async fn unsupported_flow_is_an_error_before_sending() {
        let transport = MockTransport::replying(Ok(Ok(Response::new(200, "{}"))));
        let error = execute_connector_processing_step(
            &transport,
            &EchoConnector,
            &router_data::<Store>("42"),
        )
        .await
        .unwrap_err();
        assert_eq!(
            error.current_context(),
            &ConnectorError::FlowNotSupported {
                flow: "store".to_string(),
                connector: "echo".to_string(),
            }
        );
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn masked_headers_hide_secrets() {
        let mut headers = Headers::new();
        headers.insert((
            "Authorization".to_string(),
            "Passcode abc".to_string().into_masked(),
        ));
        headers.insert((
            "Content-Type".to_string(),
            Maskable::new_normal("application/json".to_string()),
        ));
        let logged = masked_headers(&headers);
        assert_eq!(logged["Content-Type"], "application/json");
        assert_ne!(logged["Authorization"], "Passcode abc");
    }
}
