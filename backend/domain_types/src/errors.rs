use common_enums::StandardErrorCode;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConnectorError {
    #[error("Error while obtaining URL for the integration")]
    FailedToObtainIntegrationUrl,
    #[error("Failed to encode connector request")]
    RequestEncodingFailed,
    #[error("Request encoding failed : {0}")]
    RequestEncodingFailedWithReason(String),
    #[error("Failed to deserialize connector response")]
    ResponseDeserializationFailed,
    #[error("Failed to execute a processing step: {0:?}")]
    ProcessingStepFailed(Option<bytes::Bytes>),
    #[error("Failed to handle connector response")]
    ResponseHandlingFailed,
    #[error("Missing required field: {field_name}")]
    MissingRequiredField { field_name: &'static str },
    #[error("Missing required fields: {field_names:?}")]
    MissingRequiredFields { field_names: Vec<&'static str> },
    #[error("Failed to obtain authentication type")]
    FailedToObtainAuthType,
    #[error("This step has not been implemented for: {0}")]
    NotImplemented(String),
    #[error("{message} is not supported by {connector}")]
    NotSupported {
        message: String,
        connector: &'static str,
    },
    #[error("{flow} flow not supported by {connector} connector")]
    FlowNotSupported { flow: String, connector: String },
    #[error("Invalid connector name {0}")]
    InvalidConnectorName(String),
    #[error("Invalid configuration value provided: {config}")]
    InvalidConnectorConfig { config: &'static str },
    #[error("Authorization `{authorization}` is not a valid {connector} reference")]
    InvalidAuthorization {
        authorization: String,
        connector: &'static str,
    },
    #[error("Invalid Data format")]
    InvalidDataFormat { field_name: &'static str },
    #[error("Failed to convert amount to the required type")]
    AmountConversionFailed,
    #[error("{message}")]
    SimulatedException { message: &'static str },
}

impl ConnectorError {
    /// Classification used when the error ends up on a failed response.
    pub fn standard_error_code(&self) -> StandardErrorCode {
        match self {
            Self::MissingRequiredField { .. } | Self::MissingRequiredFields { .. } => {
                StandardErrorCode::MissingRequiredField
            }
            Self::FailedToObtainAuthType => StandardErrorCode::AuthenticationFailure,
            Self::InvalidConnectorConfig { .. }
            | Self::FailedToObtainIntegrationUrl
            | Self::InvalidConnectorName(_) => StandardErrorCode::ConfigError,
            Self::NotImplemented(_) | Self::NotSupported { .. } | Self::FlowNotSupported { .. } => {
                StandardErrorCode::UnsupportedFeature
            }
            Self::ResponseDeserializationFailed => StandardErrorCode::UnparsableResponse,
            Self::AmountConversionFailed => StandardErrorCode::InvalidAmount,
            Self::RequestEncodingFailed
            | Self::RequestEncodingFailedWithReason(_)
            | Self::ProcessingStepFailed(_)
            | Self::ResponseHandlingFailed
            | Self::InvalidAuthorization { .. }
            | Self::InvalidDataFormat { .. }
            | Self::SimulatedException { .. } => StandardErrorCode::ProcessingError,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ApiClientError {
    #[error("Header map construction failed")]
    HeaderMapConstructionFailed,
    #[error("Invalid proxy configuration")]
    InvalidProxyConfiguration,
    #[error("Client construction failed")]
    ClientConstructionFailed,
    #[error("URL encoding of request payload failed")]
    UrlEncodingFailed,
    #[error("Failed to send request to connector {0}")]
    RequestNotSent(String),
    #[error("Failed to decode response")]
    ResponseDecodingFailed,
    #[error("Server responded with Request Timeout")]
    RequestTimeoutReceived,
    #[error("connection closed before a message could complete")]
    ConnectionClosedIncompleteMessage,
}

impl ApiClientError {
    pub fn is_upstream_timeout(&self) -> bool {
        self == &Self::RequestTimeoutReceived
    }

    pub fn is_connection_closed_before_message_could_complete(&self) -> bool {
        self == &Self::ConnectionClosedIncompleteMessage
    }
}
