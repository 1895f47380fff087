use common_enums::GatewayMode;
use common_utils::consts::Env;
use payment_gateway::configs::{workspace_path, Config};

fn load(file_name: &str) -> Config {
    let path = workspace_path().join("config").join(file_name);
    Config::new_with_config_path(Some(path)).unwrap()
}

#[test]
fn every_environment_file_loads() {
    for (file_name, environment) in [
        ("development.toml", Env::Development),
        ("sandbox.toml", Env::Sandbox),
        ("production.toml", Env::Production),
    ] {
        let config = load(file_name);
        assert_eq!(config.common.environment, environment, "{file_name}");
        assert!(config.gateway.connector().is_ok(), "{file_name}");
        assert!(!config.connectors.nmi.base_url.is_empty(), "{file_name}");
    }
}

#[test]
fn development_uses_the_bogus_gateway() {
    let config = load("development.toml");
    assert_eq!(config.gateway.connector, "bogus");
    assert_eq!(config.gateway.mode, GatewayMode::Test);
    assert_eq!(
        config.connectors.bamboraapac.base_url_for(GatewayMode::Test),
        "https://demo.ippayments.com.au/interface/api/"
    );
}

#[test]
fn production_switches_to_live_endpoints() {
    let config = load("production.toml");
    assert_eq!(config.gateway.mode, GatewayMode::Production);
    assert_eq!(
        config
            .connectors
            .bamboraapac
            .base_url_for(config.gateway.mode),
        "https://www.ippayments.com.au/interface/api/"
    );
}

#[test]
fn missing_file_is_an_error() {
    let path = workspace_path().join("config").join("missing.toml");
    assert!(Config::new_with_config_path(Some(path)).is_err());
}
