//! Commonly used constants

/// Error code used when a vendor does not return one
pub const NO_ERROR_CODE: &str = "No error code";
/// Error message used when a vendor does not return one
pub const NO_ERROR_MESSAGE: &str = "No error message";

/// Message returned when a vendor body cannot be decoded
pub const UNPARSABLE_RESPONSE_MESSAGE: &str = "Unable to parse response";
/// Message returned when a vendor body decodes but is not what the API documents
pub const INVALID_RESPONSE_MESSAGE: &str = "Invalid response received from the API";

/// Message of the failed response returned for an expired card
pub const EXPIRED_CARD_MESSAGE: &str = "Card has expired";

/// Placeholder sent for the state of addresses outside the United States and Canada
pub const STATE_NOT_APPLICABLE: &str = "n/a";

/// Amount authorized and voided again by the default verify flow, in minor units
pub const DEFAULT_VERIFY_AMOUNT: i64 = 100;

/// Separator between the parts of a rendered authorization token
pub const AUTHORIZATION_SEPARATOR: char = '|';

/// Request timeout applied by the HTTP transport, in seconds
pub const REQUEST_TIME_OUT: u64 = 30;

/// Value of the `Via` header attached to every outgoing request
pub const USER_AGENT: &str = "payment-gateway";

/// Prefix of the environment variables that override configuration values
pub const ENV_PREFIX: &str = "GATEWAY";

/// Environment variable selecting the configuration file
pub const RUN_ENV: &str = "RUN_ENV";

/// Deployment environment, one configuration file each.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Env {
    #[default]
    Development,
    Sandbox,
    Production,
}

impl Env {
    /// Read from `RUN_ENV`, falling back to development.
    pub fn current_env() -> Self {
        std::env::var(RUN_ENV)
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    pub const fn config_path(self) -> &'static str {
        match self {
            Self::Development => "development.toml",
            Self::Sandbox => "sandbox.toml",
            Self::Production => "production.toml",
        }
    }
}
