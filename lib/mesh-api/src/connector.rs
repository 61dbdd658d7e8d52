//! Router connector specification and observed status

use serde::{Deserialize, Serialize};

/// Role every mesh connector is created with
pub const CONNECTOR_ROLE: &str = "route-container";

/// SSL profile routers use for broker connections
pub const CONNECTOR_SSL_PROFILE: &str = "infra_tls";

/// SASL mechanism used for broker connections
pub const CONNECTOR_SASL_MECHANISMS: &str = "EXTERNAL";

/// Idle timeout applied to broker connections
pub const CONNECTOR_IDLE_TIMEOUT_SECONDS: u32 = 16;

/// RouterConnector describes the connector a router should hold to one broker.
///
/// It is derived from the broker on every cycle and never stored, so applying
/// it against a router that already has an equivalent connector must be a no-op.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterConnector {
    /// Broker host the router connects to
    pub host: String,

    /// Broker port, as text
    pub port: String,

    /// Connector role
    pub role: String,

    /// SSL profile name configured on the router
    pub ssl_profile: String,

    /// SASL mechanisms offered on the connection
    pub sasl_mechanisms: String,

    /// Idle timeout in seconds
    pub idle_timeout_seconds: u32,

    /// Whether the broker hostname is verified against its certificate
    pub verify_hostname: bool,
}

impl RouterConnector {
    /// Build the mesh connector pointing at the given broker
    pub fn for_broker(host: &str, port: u16) -> Self {
        Self {
            host: host.to_string(),
            port: port.to_string(),
            role: CONNECTOR_ROLE.to_string(),
            ssl_profile: CONNECTOR_SSL_PROFILE.to_string(),
            sasl_mechanisms: CONNECTOR_SASL_MECHANISMS.to_string(),
            idle_timeout_seconds: CONNECTOR_IDLE_TIMEOUT_SECONDS,
            verify_hostname: true,
        }
    }

    /// Target address in `host:port` form
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Observed state of a connector on one router
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorStatus {
    /// Router holding the connector
    pub router_host: String,

    /// Broker host the connector points at
    pub host: String,

    /// Broker port the connector points at
    pub port: String,

    /// Whether the connection is currently established
    #[serde(default)]
    pub connected: bool,

    /// Detail reported alongside the status, usually the last connection error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ConnectorStatus {
    /// Status of an established connector
    pub fn connected(router_host: &str, connector: &RouterConnector) -> Self {
        Self {
            router_host: router_host.to_string(),
            host: connector.host.clone(),
            port: connector.port.clone(),
            connected: true,
            message: None,
        }
    }

    /// Status of a connector that is configured but not connected
    pub fn disconnected(router_host: &str, connector: &RouterConnector, message: impl Into<String>) -> Self {
        Self {
            router_host: router_host.to_string(),
            host: connector.host.clone(),
            port: connector.port.clone(),
            connected: false,
            message: Some(message.into()),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }
}
