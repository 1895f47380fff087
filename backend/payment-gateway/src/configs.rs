use std::path::PathBuf;

use common_enums::GatewayMode;
use common_utils::consts;
use domain_types::{
    connector_types::ConnectorEnum,
    router_data::ConnectorAuthType,
    types::{Connectors, Proxy},
};

use crate::{error::ConfigurationError, logger::config::Log};

#[derive(Clone, serde::Deserialize, Debug)]
pub struct Config {
    pub common: Common,
    #[serde(default)]
    pub log: Log,
    #[serde(default)]
    pub proxy: Proxy,
    pub gateway: GatewaySettings,
    pub connectors: Connectors,
}

#[derive(Clone, serde::Deserialize, Debug)]
pub struct Common {
    pub environment: consts::Env,
}

/// The gateway a client talks to and the credentials it presents.
#[derive(Clone, serde::Deserialize, Debug)]
pub struct GatewaySettings {
    /// Registered connector name, such as `nmi` or `bamboraapac`.
    pub connector: String,
    #[serde(default)]
    pub mode: GatewayMode,
    #[serde(default)]
    pub auth: ConnectorAuthType,
}

impl GatewaySettings {
    pub fn connector(&self) -> Result<ConnectorEnum, ConfigurationError> {
        self.connector
            .trim()
            .parse()
            .map_err(|_| ConfigurationError::InvalidConnectorName(self.connector.clone()))
    }
}

impl Config {
    /// Load `config/<RUN_ENV>.toml` from the workspace.
    pub fn new() -> Result<Self, config::ConfigError> {
        Self::new_with_config_path(None)
    }

    /// Load `explicit_config_path`, or the environment's file when absent.
    /// `GATEWAY__`-prefixed variables override file values.
    pub fn new_with_config_path(
        explicit_config_path: Option<PathBuf>,
    ) -> Result<Self, config::ConfigError> {
        let env = consts::Env::current_env();
        let source = config::Config::builder()
            .set_override("env", env.to_string())?
            .add_source(config::File::from(Self::config_path(&env, explicit_config_path)))
            .add_source(
                config::Environment::with_prefix(consts::ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("proxy.bypass_proxy_urls"),
            )
            .build()?;

        #[allow(clippy::print_stderr)]
        let config: Self = serde_path_to_error::deserialize(source).map_err(|error| {
            eprintln!("Unable to deserialize application configuration: {error}");
            error.into_inner()
        })?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        self.gateway
            .connector()
            .map(|_| ())
            .map_err(|error| config::ConfigError::Message(error.to_string()))
    }

    pub fn config_path(
        environment: &consts::Env,
        explicit_config_path: Option<PathBuf>,
    ) -> PathBuf {
        explicit_config_path.unwrap_or_else(|| {
            workspace_path()
                .join("config")
                .join(environment.config_path())
        })
    }
}

pub fn workspace_path() -> PathBuf {
    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        let mut path = PathBuf::from(manifest_dir);
        path.pop();
        path.pop();
        path
    } else {
        PathBuf::from(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let path = Config::config_path(
            &consts::Env::Production,
            Some(PathBuf::from("/etc/gateway.toml")),
        );
        assert_eq!(path, PathBuf::from("/etc/gateway.toml"));
    }

    #[test]
    fn default_path_follows_the_environment() {
        let path = Config::config_path(&consts::Env::Sandbox, None);
        assert!(path.ends_with("config/sandbox.toml"));
    }

    #[test]
    fn connector_names_are_checked() {
        let settings = GatewaySettings {
            connector: " nmi ".to_string(),
            mode: GatewayMode::Test,
            auth: ConnectorAuthType::NoKey,
        };
        assert_eq!(settings.connector().unwrap(), ConnectorEnum::Nmi);

        let settings = GatewaySettings {
            connector: "paypal".to_string(),
            ..settings
        };
        assert!(matches!(
            settings.connector(),
            Err(ConfigurationError::InvalidConnectorName(name)) if name == "paypal"
        ));
    }
}
