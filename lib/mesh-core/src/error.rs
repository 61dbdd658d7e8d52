use thiserror::Error;

pub type Result<T> = std::result::Result<T, InfraError>;

#[derive(Error, Debug)]
pub enum InfraError {
    #[error("Connection to {host}:{port} failed: {reason}")]
    Connection {
        host: String,
        port: u16,
        reason: String,
    },

    #[error("Router {0} is not initialized")]
    NotInitialized(String),

    #[error("Management request to {host} failed: {reason}")]
    Management { host: String, reason: String },

    #[error("Connector to {target} not found on router {router}")]
    ConnectorNotFound { router: String, target: String },

    #[error("Timed out talking to {0}")]
    Timeout(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
