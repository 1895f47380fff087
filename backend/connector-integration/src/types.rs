use std::str::FromStr;

use common_utils::CustomResult;
use domain_types::{connector_types::ConnectorEnum, errors::ConnectorError};
use interfaces::connector_types::BoxedConnector;

use crate::connectors;

#[derive(Clone)]
pub struct ConnectorData {
    pub connector: BoxedConnector,
    pub connector_name: ConnectorEnum,
}

impl ConnectorData {
    pub fn get_connector_by_name(connector_name: &ConnectorEnum) -> Self {
        let connector = Self::convert_connector(*connector_name);
        Self {
            connector,
            connector_name: *connector_name,
        }
    }

    /// Look a connector up by its configured name, such as `bamboraapac`.
    pub fn get_connector_by_str(name: &str) -> CustomResult<Self, ConnectorError> {
        let connector_name = ConnectorEnum::from_str(name.trim())
            .map_err(|_| ConnectorError::InvalidConnectorName(name.to_string()))?;
        Ok(Self::get_connector_by_name(&connector_name))
    }

    fn convert_connector(connector_name: ConnectorEnum) -> BoxedConnector {
        match connector_name {
            ConnectorEnum::Bambora => Box::new(connectors::Bambora::new()),
            ConnectorEnum::Bamboraapac => Box::new(connectors::Bamboraapac::new()),
            ConnectorEnum::Nmi => Box::new(connectors::Nmi::new()),
            ConnectorEnum::Bogus => Box::new(connectors::Bogus::new()),
        }
    }
}

pub struct ResponseRouterData<Response, RouterData> {
    pub response: Response,
    pub router_data: RouterData,
    pub http_code: u16,
}

#[cfg(test)]
pub(crate) mod test_utils {
    use std::{
        collections::{HashMap, VecDeque},
        sync::{Arc, Mutex},
    };

    use common_utils::{
        request::{Method, Request},
        CustomResult,
    };
    use domain_types::{errors::ApiClientError, router_response_types::Response};
    use interfaces::transport::ConnectorTransport;

    pub(crate) type TransportResult = CustomResult<Result<Response, Response>, ApiClientError>;

    #[derive(Debug, Clone)]
    pub(crate) struct RecordedRequest {
        pub url: String,
        pub method: Method,
        pub headers: HashMap<String, String>,
        pub body: Option<String>,
    }

    /// Answers requests from a script and records what was sent.
    #[derive(Default)]
    pub(crate) struct MockTransport {
        responses: Mutex<VecDeque<TransportResult>>,
        requests: Mutex<Vec<RecordedRequest>>,
    }

    impl MockTransport {
        pub(crate) fn new(responses: Vec<TransportResult>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::default(),
            })
        }

        pub(crate) fn ok(body: &str) -> TransportResult {
            Ok(Ok(Response::new(200, body.to_string())))
        }

        pub(crate) fn http_error(status_code: u16, body: &str) -> TransportResult {
            Ok(Err(Response::new(status_code, body.to_string())))
        }

        pub(crate) fn requests(&self) -> Vec<RecordedRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub(crate) fn last_request(&self) -> RecordedRequest {
            self.requests().pop().expect("no request was sent")
        }
    }

    #[async_trait::async_trait]
    impl ConnectorTransport for MockTransport {
        async fn send(&self, request: Request) -> TransportResult {
            self.requests.lock().unwrap().push(RecordedRequest {
                url: request.url.clone(),
                method: request.method,
                headers: request.get_headers_map(),
                body: request
                    .body
                    .as_ref()
                    .map(|body| String::from_utf8_lossy(&body.get_body_bytes()).into_owned()),
            });
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| {
                    Err(ApiClientError::RequestNotSent("no scripted response".to_string()).into())
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connectors_are_looked_up_by_name() {
        let data = ConnectorData::get_connector_by_name(&ConnectorEnum::Bamboraapac);
        assert_eq!(data.connector.id(), "bamboraapac");
        assert_eq!(data.connector_name, ConnectorEnum::Bamboraapac);

        let data = ConnectorData::get_connector_by_str(" nmi ").unwrap();
        assert_eq!(data.connector.id(), "nmi");
    }

    #[test]
    fn unknown_connector_name_is_rejected() {
        let error = ConnectorData::get_connector_by_str("paypal")
            .err()
            .unwrap();
        assert_eq!(
            error.current_context(),
            &ConnectorError::InvalidConnectorName("paypal".to_string())
        );
    }
}
