//! Shared types for the connector mesh
//!
//! This library defines the values exchanged between the mesh components:
//! - RouterConnector: the connector a router should hold towards a broker
//! - ConnectorStatus: observed state of one router to broker connector
//! - EndpointKind: routers and brokers, with their fixed ports

pub mod connector;
pub mod endpoint;

pub use connector::{ConnectorStatus, RouterConnector};
pub use endpoint::{EndpointKind, BROKER_PORT, ROUTER_PORT};
