#[derive(Debug, Clone)]
pub struct Purchase;

#[derive(Debug, Clone)]
pub struct Authorize;

#[derive(Debug, Clone)]
pub struct Capture;

#[derive(Debug, Clone)]
pub struct Refund;

#[derive(Debug, Clone)]
pub struct Void;

#[derive(Debug, Clone)]
pub struct Verify;

#[derive(Debug, Clone)]
pub struct Store;

#[derive(Debug, Clone)]
pub struct Unstore;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum FlowName {
    Purchase,
    Authorize,
    Capture,
    Refund,
    Void,
    Verify,
    Store,
    Unstore,
}

/// Ties a flow marker to the name used in logs and errors.
pub trait Flow: Send + Sync + 'static {
    const NAME: FlowName;
}

macro_rules! flow_name {
    ($($flow:ident),* $(,)?) => {
        $(
            impl Flow for $flow {
                const NAME: FlowName = FlowName::$flow;
            }
        )*
    };
}

flow_name!(Purchase, Authorize, Capture, Refund, Void, Verify, Store, Unstore);
