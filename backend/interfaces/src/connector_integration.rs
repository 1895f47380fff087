use common_utils::{
    request::{Method, Request, RequestBuilder, RequestContent},
    CustomResult,
};
use domain_types::{
    connector_flow::Flow, errors::ConnectorError, gateway_response::GatewayResponseBuilder,
    router_data::RouterData, router_response_types::Response,
};
use hyperswitch_masking::Maskable;

use crate::api::ConnectorCommon;

pub type BoxedConnectorIntegration<'a, F, Req> = Box<&'a dyn ConnectorIntegration<F, Req>>;

/// Lets a boxed connector hand out the integration for one of its flows.
pub trait ConnectorIntegrationAny<F: Flow, Req>: Send + Sync + 'static {
    fn get_connector_integration(&self) -> BoxedConnectorIntegration<'_, F, Req>;
}

impl<S, F: Flow, Req> ConnectorIntegrationAny<F, Req> for S
where
    S: ConnectorIntegration<F, Req> + Send + Sync,
{
    fn get_connector_integration(&self) -> BoxedConnectorIntegration<'_, F, Req> {
        Box::new(self)
    }
}

/// One flow of one connector: how to build its request and read its response.
///
/// An empty `impl` block marks the flow as unsupported; building its request
/// fails with `FlowNotSupported`.
pub trait ConnectorIntegration<F: Flow, Req>:
    ConnectorIntegrationAny<F, Req> + ConnectorCommon + Send + Sync
{
    fn get_headers(
        &self,
        _req: &RouterData<F, Req>,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, ConnectorError> {
        Ok(Vec::new())
    }

    fn get_content_type(&self) -> &'static str {
        self.common_get_content_type()
    }

    fn get_http_method(&self) -> Method {
        Method::Post
    }

    fn get_url(&self, _req: &RouterData<F, Req>) -> CustomResult<String, ConnectorError> {
        Err(ConnectorError::FlowNotSupported {
            flow: F::NAME.to_string(),
            connector: self.id().to_string(),
        }
        .into())
    }

    fn get_request_body(
        &self,
        _req: &RouterData<F, Req>,
    ) -> CustomResult<Option<RequestContent>, ConnectorError> {
        Ok(None)
    }

    fn build_request(&self, req: &RouterData<F, Req>) -> CustomResult<Request, ConnectorError> {
        Ok(RequestBuilder::new()
            .method(self.get_http_method())
            .url(&self.get_url(req)?)
            .attach_default_headers()
            .headers(self.get_headers(req)?)
            .set_optional_body(self.get_request_body(req)?)
            .build())
    }

    /// Read a 2xx body. Declines the vendor reports with a success status
    /// still come back as a failed response.
    fn handle_response(
        &self,
        _data: &RouterData<F, Req>,
        _res: Response,
    ) -> CustomResult<GatewayResponseBuilder, ConnectorError> {
        Err(ConnectorError::NotImplemented(format!(
            "{} response handling for {}",
            F::NAME,
            self.id()
        ))
        .into())
    }

    /// Read the body of a non-2xx answer.
    fn get_error_response(
        &self,
        res: Response,
    ) -> CustomResult<GatewayResponseBuilder, ConnectorError> {
        Ok(self.build_error_response(res)?.into_gateway_response())
    }
}
