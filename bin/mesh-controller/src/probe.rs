//! Endpoint states backed by TCP reachability probes
//!
//! These states keep the connector bookkeeping on the controller side and use
//! plain TCP connects to decide whether routers and brokers are reachable.

use async_trait::async_trait;
use mesh_api::{ConnectorStatus, RouterConnector};
use mesh_core::{BrokerState, EndpointState, InfraError, Result, RouterState};
use std::collections::HashMap;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time;
use tracing::{debug, info};

/// Open a TCP connection to `host:port` within `timeout`
async fn probe(host: &str, port: u16, timeout: Duration) -> Result<TcpStream> {
    match time::timeout(timeout, TcpStream::connect((host, port))).await {
        Ok(Ok(stream)) => {
            debug!("TCP connection to {}:{} succeeded", host, port);
            Ok(stream)
        }
        Ok(Err(e)) => Err(InfraError::Connection {
            host: host.to_string(),
            port,
            reason: e.to_string(),
        }),
        Err(_) => Err(InfraError::Timeout(format!("{}:{}", host, port))),
    }
}

pub struct ProbeRouterState {
    host: String,
    port: u16,
    timeout: Duration,
    connection: Option<TcpStream>,
    // keyed by target host and port
    connectors: HashMap<(String, String), RouterConnector>,
}

impl ProbeRouterState {
    pub fn new(host: &str, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.to_string(),
            port,
            timeout,
            connection: None,
            connectors: HashMap::new(),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.connection.is_some()
    }

    fn require_initialized(&self) -> Result<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(InfraError::NotInitialized(self.host.clone()))
        }
    }
}

#[async_trait]
impl EndpointState for ProbeRouterState {
    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> u16 {
        self.port
    }

    async fn shutdown(&mut self) -> Result<()> {
        self.connection.take();
        self.connectors.clear();
        debug!("Router {}:{} shut down", self.host, self.port);
        Ok(())
    }
}

#[async_trait]
impl RouterState for ProbeRouterState {
    async fn initialize(&mut self) -> Result<()> {
        if self.is_initialized() {
            return Ok(());
        }
        let stream = probe(&self.host, self.port, self.timeout).await?;
        self.connection = Some(stream);
        info!("Router {}:{} initialized", self.host, self.port);
        Ok(())
    }

    async fn ensure_connector(&mut self, connector: &RouterConnector) -> Result<()> {
        self.require_initialized()?;

        let key = (connector.host.clone(), connector.port.clone());
        let unchanged = self.connectors.get(&key).map(|existing| existing == connector);
        match unchanged {
            Some(true) => {
                debug!("Router {} already has connector to {}", self.host, connector.address());
            }
            Some(false) => {
                info!("Updating connector {} -> {}", self.host, connector.address());
                self.connectors.insert(key, connector.clone());
            }
            None => {
                info!("Creating connector {} -> {}", self.host, connector.address());
                self.connectors.insert(key, connector.clone());
            }
        }
        Ok(())
    }

    async fn get_connector_status(&mut self, connector: &RouterConnector) -> Result<ConnectorStatus> {
        self.require_initialized()?;

        let key = (connector.host.clone(), connector.port.clone());
        if !self.connectors.contains_key(&key) {
            return Err(InfraError::ConnectorNotFound {
                router: self.host.clone(),
                target: connector.address(),
            });
        }

        let port: u16 = connector.port.parse().map_err(|_| {
            InfraError::Internal(format!("Invalid connector port: {}", connector.port))
        })?;

        match probe(&connector.host, port, self.timeout).await {
            Ok(_) => Ok(ConnectorStatus::connected(&self.host, connector)),
            Err(e) => Ok(ConnectorStatus::disconnected(&self.host, connector, e.to_string())),
        }
    }
}

pub struct ProbeBrokerState {
    host: String,
    port: u16,
}

impl ProbeBrokerState {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            host: host.to_string(),
            port,
        }
    }
}

#[async_trait]
impl EndpointState for ProbeBrokerState {
    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> u16 {
        self.port
    }

    async fn shutdown(&mut self) -> Result<()> {
        Ok(())
    }
}

impl BrokerState for ProbeBrokerState {}
