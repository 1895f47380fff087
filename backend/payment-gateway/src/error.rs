use domain_types::errors::ConnectorError;

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("error while loading configuration: {0}")]
    ConfigError(#[from] config::ConfigError),
    #[error("unknown connector `{0}`")]
    InvalidConnectorName(String),
}

/// Failures surfaced by the command line tool.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("invalid value for `{field}`: {reason}")]
    InvalidArgument { field: &'static str, reason: String },
    #[error("operation failed: {0:?}")]
    Gateway(error_stack::Report<ConnectorError>),
    #[error("unable to render the response: {0}")]
    Output(#[from] serde_json::Error),
}

impl From<error_stack::Report<ConnectorError>> for CliError {
    fn from(report: error_stack::Report<ConnectorError>) -> Self {
        Self::Gateway(report)
    }
}
