//! Endpoint kinds and their fixed ports
use std::fmt;

/// Management port every router listens on
pub const ROUTER_PORT: u16 = 7777;

/// AMQPS port every broker listens on
pub const BROKER_PORT: u16 = 5671;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EndpointKind {
    Router,
    Broker,
}

impl EndpointKind {
    /// Fixed port for endpoints of this kind
    pub fn port(&self) -> u16 {
        match self {
            EndpointKind::Router => ROUTER_PORT,
            EndpointKind::Broker => BROKER_PORT,
        }
    }
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointKind::Router => write!(f, "router"),
            EndpointKind::Broker => write!(f, "broker"),
        }
    }
}
