use domain_types::{
    connector_flow,
    connector_types::{
        PaymentMethodStoreData, PaymentMethodUnstoreData, PaymentVoidData, PaymentsAuthorizeData,
        PaymentsCaptureData, PaymentsVerifyData, RefundsData,
    },
};

use crate::{api::ConnectorCommon, connector_integration::ConnectorIntegration};

/// Every flow a gateway adapter can be asked to run.
pub trait ConnectorServiceTrait:
    ConnectorCommon
    + ValidationTrait
    + PaymentPurchase
    + PaymentAuthorize
    + PaymentCapture
    + PaymentVoid
    + PaymentVerify
    + RefundExecute
    + PaymentMethodStore
    + PaymentMethodUnstore
{
}

pub type BoxedConnector = Box<&'static (dyn ConnectorServiceTrait + Sync)>;

/// Per-connector switches consulted before a flow runs.
pub trait ValidationTrait {
    /// Run the connector's own verify flow instead of authorize followed by void.
    fn should_do_native_verify(&self) -> bool {
        false
    }
}

pub trait PaymentPurchase:
    ConnectorIntegration<connector_flow::Purchase, PaymentsAuthorizeData>
{
}

pub trait PaymentAuthorize:
    ConnectorIntegration<connector_flow::Authorize, PaymentsAuthorizeData>
{
}

pub trait PaymentCapture: ConnectorIntegration<connector_flow::Capture, PaymentsCaptureData> {}

pub trait PaymentVoid: ConnectorIntegration<connector_flow::Void, PaymentVoidData> {}

pub trait PaymentVerify: ConnectorIntegration<connector_flow::Verify, PaymentsVerifyData> {}

pub trait RefundExecute: ConnectorIntegration<connector_flow::Refund, RefundsData> {}

pub trait PaymentMethodStore:
    ConnectorIntegration<connector_flow::Store, PaymentMethodStoreData>
{
}

pub trait PaymentMethodUnstore:
    ConnectorIntegration<connector_flow::Unstore, PaymentMethodUnstoreData>
{
}
