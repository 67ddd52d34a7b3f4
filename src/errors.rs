//! Error types for provisioning operations

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while provisioning or tearing down a node
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// Image identifier did not resolve to a known platform family
    #[error("platform {0} not yet supported on docker")]
    UnsupportedPlatform(String),

    /// Every candidate host port already forwards to a container's port 22
    #[error("All front facing ports are in use ({first}-{last})")]
    PortRangeExhausted { first: u16, last: u16 },

    /// Teardown target is not present in the inventory
    #[error("node {0} not found in inventory")]
    NodeNotFound(String),

    /// Malformed or contradictory request fields
    #[error("{0}")]
    RequestValidation(String),

    /// External command exited with a non-zero status
    #[error("command '{command}' exited with status {exit_code}: {output}")]
    CommandExecution {
        command: String,
        exit_code: i32,
        output: String,
    },

    /// External command could not be started at all
    #[error("failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Teardown requires an existing inventory file
    #[error("Unable to find '{}'", .0.display())]
    InventoryMissing(PathBuf),

    /// Inventory could not be read, parsed or written
    #[error("Inventory error: {0}")]
    Inventory(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for provisioning operations
pub type ProvisionResult<T> = Result<T, ProvisionError>;

impl From<serde_json::Error> for ProvisionError {
    fn from(err: serde_json::Error) -> Self {
        ProvisionError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for ProvisionError {
    fn from(err: serde_yaml::Error) -> Self {
        ProvisionError::Serialization(err.to_string())
    }
}
