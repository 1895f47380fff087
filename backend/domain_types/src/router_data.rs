use std::marker::PhantomData;

use common_enums::{GatewayMode, StandardErrorCode};
use common_utils::consts::{NO_ERROR_CODE, NO_ERROR_MESSAGE};
use hyperswitch_masking::{PeekInterface, Secret};

use crate::{errors::ConnectorError, gateway_response::GatewayResponse, types::Connectors};

pub type Error = error_stack::Report<ConnectorError>;

/// Everything a connector needs to build one request for flow `F`.
#[derive(Debug, Clone)]
pub struct RouterData<F, Req> {
    pub flow: PhantomData<F>,
    pub request: Req,
    pub connector_auth_type: ConnectorAuthType,
    pub connectors: Connectors,
    pub gateway_mode: GatewayMode,
}

impl<F, Req> RouterData<F, Req> {
    pub fn new(
        request: Req,
        connector_auth_type: ConnectorAuthType,
        connectors: Connectors,
        gateway_mode: GatewayMode,
    ) -> Self {
        Self {
            flow: PhantomData,
            request,
            connector_auth_type,
            connectors,
            gateway_mode,
        }
    }

    /// Same credentials and endpoints for another flow.
    pub fn for_flow<F2, Req2>(&self, request: Req2) -> RouterData<F2, Req2> {
        RouterData {
            flow: PhantomData,
            request,
            connector_auth_type: self.connector_auth_type.clone(),
            connectors: self.connectors.clone(),
            gateway_mode: self.gateway_mode,
        }
    }
}

/// Credentials a connector authenticates with, as read from configuration.
#[derive(Default, Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(tag = "auth_type")]
pub enum ConnectorAuthType {
    HeaderKey {
        api_key: Secret<String>,
    },
    BodyKey {
        api_key: Secret<String>,
        key1: Secret<String>,
    },
    SignatureKey {
        api_key: Secret<String>,
        key1: Secret<String>,
        api_secret: Secret<String>,
    },
    MultiAuthKey {
        api_key: Secret<String>,
        key1: Secret<String>,
        api_secret: Secret<String>,
        key2: Secret<String>,
    },
    #[default]
    NoKey,
}

impl ConnectorAuthType {
    // keep the first and last two characters, mask everything for short keys
    fn mask_key(key: &Secret<String>) -> Secret<String> {
        let key = key.peek();
        let key_len = key.chars().count();
        let masked_key = if key_len <= 4 {
            "*".repeat(key_len)
        } else {
            key.chars()
                .enumerate()
                .map(|(index, character)| {
                    if index < 2 || index >= key_len - 2 {
                        character
                    } else {
                        '*'
                    }
                })
                .collect()
        };
        Secret::new(masked_key)
    }

    /// Copy with every key partially masked, safe to log.
    pub fn get_masked_keys(&self) -> Self {
        match self {
            Self::NoKey => Self::NoKey,
            Self::HeaderKey { api_key } => Self::HeaderKey {
                api_key: Self::mask_key(api_key),
            },
            Self::BodyKey { api_key, key1 } => Self::BodyKey {
                api_key: Self::mask_key(api_key),
                key1: Self::mask_key(key1),
            },
            Self::SignatureKey {
                api_key,
                key1,
                api_secret,
            } => Self::SignatureKey {
                api_key: Self::mask_key(api_key),
                key1: Self::mask_key(key1),
                api_secret: Self::mask_key(api_secret),
            },
            Self::MultiAuthKey {
                api_key,
                key1,
                api_secret,
                key2,
            } => Self::MultiAuthKey {
                api_key: Self::mask_key(api_key),
                key1: Self::mask_key(key1),
                api_secret: Self::mask_key(api_secret),
                key2: Self::mask_key(key2),
            },
        }
    }

    pub fn auth_type_name(&self) -> &'static str {
        match self {
            Self::HeaderKey { .. } => "HeaderKey",
            Self::BodyKey { .. } => "BodyKey",
            Self::SignatureKey { .. } => "SignatureKey",
            Self::MultiAuthKey { .. } => "MultiAuthKey",
            Self::NoKey => "NoKey",
        }
    }
}

/// A vendor error body reduced to the fields every adapter understands.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub reason: Option<String>,
    pub status_code: u16,
    pub standard_error_code: StandardErrorCode,
}

impl Default for ErrorResponse {
    fn default() -> Self {
        Self {
            code: NO_ERROR_CODE.to_string(),
            message: NO_ERROR_MESSAGE.to_string(),
            reason: None,
            status_code: http::StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            standard_error_code: StandardErrorCode::ProcessingError,
        }
    }
}

impl ErrorResponse {
    /// Failed response carrying the vendor's message, code and reason.
    pub fn into_gateway_response(self) -> crate::gateway_response::GatewayResponseBuilder {
        let builder = GatewayResponse::failure(self.message, self.standard_error_code)
            .param("error_code", self.code)
            .param("status_code", self.status_code.to_string());
        match self.reason {
            Some(reason) => builder.param("reason", reason),
            None => builder,
        }
    }
}
