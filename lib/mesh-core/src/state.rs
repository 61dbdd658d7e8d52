//! Contracts for per-endpoint connection state
//!
//! The mesh engine never talks to routers or brokers itself. It drives state
//! objects implementing these traits, created through a [`StateFactory`] when a
//! hostname first shows up and shut down once it disappears.

use crate::Result;
use async_trait::async_trait;
use mesh_api::{ConnectorStatus, RouterConnector};
use std::sync::Arc;

/// Builds a fresh, non-initialized state for `(host, port)`
pub type StateFactory<S> = Arc<dyn Fn(&str, u16) -> S + Send + Sync>;

/// State held for a single router or broker endpoint
#[async_trait]
pub trait EndpointState: Send + Sync {
    fn host(&self) -> &str;

    fn port(&self) -> u16;

    /// Release every resource held for this endpoint.
    ///
    /// Called exactly once before the state is discarded. Errors are logged by
    /// the caller and otherwise ignored.
    async fn shutdown(&mut self) -> Result<()>;
}

/// Router endpoint able to manage connectors
#[async_trait]
pub trait RouterState: EndpointState {
    /// Prepare the router for connector operations. Called at the start of every
    /// cycle, so implementations should return early once initialized.
    async fn initialize(&mut self) -> Result<()>;

    /// Make sure a connector matching `connector` exists, creating it if absent
    async fn ensure_connector(&mut self, connector: &RouterConnector) -> Result<()>;

    /// Current status of the connector matching `connector`
    async fn get_connector_status(&mut self, connector: &RouterConnector) -> Result<ConnectorStatus>;
}

/// Broker endpoint. Brokers are only ever connector targets.
pub trait BrokerState: EndpointState {}
