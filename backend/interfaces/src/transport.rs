use common_utils::{request::Request, CustomResult};
use domain_types::{errors::ApiClientError, router_response_types::Response};

/// Sends a built request to the vendor.
///
/// `Ok(Ok(_))` is a 2xx answer, `Ok(Err(_))` any other status with its body,
/// and `Err(_)` means no usable answer arrived.
#[async_trait::async_trait]
pub trait ConnectorTransport: Send + Sync {
    async fn send(
        &self,
        request: Request,
    ) -> CustomResult<Result<Response, Response>, ApiClientError>;
}

pub type BoxedConnectorTransport = std::sync::Arc<dyn ConnectorTransport>;
