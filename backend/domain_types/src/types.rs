use common_enums::GatewayMode;
use serde::{Deserialize, Serialize};

use crate::connector_types::ConnectorEnum;

/// Endpoints of every supported vendor.
#[derive(Clone, Deserialize, Serialize, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Connectors {
    pub bambora: ConnectorParams,
    pub bamboraapac: ConnectorParams,
    pub nmi: ConnectorParams,
    pub bogus: ConnectorParams,
}

impl Connectors {
    pub fn params_for(&self, connector: ConnectorEnum) -> &ConnectorParams {
        match connector {
            ConnectorEnum::Bambora => &self.bambora,
            ConnectorEnum::Bamboraapac => &self.bamboraapac,
            ConnectorEnum::Nmi => &self.nmi,
            ConnectorEnum::Bogus => &self.bogus,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct ConnectorParams {
    /// base url
    #[serde(default)]
    pub base_url: String,
    /// live endpoint, used instead of `base_url` in production mode
    #[serde(default)]
    pub secondary_base_url: Option<String>,
}

impl ConnectorParams {
    pub fn new(base_url: impl Into<String>, secondary_base_url: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            secondary_base_url,
        }
    }

    /// The endpoint for `mode`. Test mode always uses `base_url`.
    pub fn base_url_for(&self, mode: GatewayMode) -> &str {
        match (mode, self.secondary_base_url.as_deref()) {
            (GatewayMode::Production, Some(live)) if !live.is_empty() => live,
            _ => &self.base_url,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Hash, Default)]
#[serde(default)]
pub struct Proxy {
    pub http_url: Option<String>,
    pub https_url: Option<String>,
    pub idle_pool_connection_timeout: Option<u64>,
    /// seconds
    pub request_timeout: Option<u64>,
    pub bypass_proxy_urls: Vec<String>,
}

impl Proxy {
    pub fn is_proxy_configured(&self) -> bool {
        self.http_url.is_some() || self.https_url.is_some()
    }

    pub fn should_bypass(&self, url: &str) -> bool {
        self.bypass_proxy_urls
            .iter()
            .any(|bypass| url.starts_with(bypass.as_str()))
    }
}
