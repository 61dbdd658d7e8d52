//! Connector mesh reconciliation
//!
//! This library provides:
//! - Endpoint set reconciliation for routers and brokers
//! - Connector topology synchronization between every router and broker
//! - InfraClient, which serializes synchronization cycles and shutdown

pub mod error;
pub mod infra;
pub mod reconcile;
pub mod state;
pub mod topology;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{InfraError, Result};
pub use infra::InfraClient;
pub use state::{BrokerState, EndpointState, RouterState, StateFactory};
