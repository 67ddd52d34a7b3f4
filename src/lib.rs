//! Short-lived container test targets reachable over SSH
//!
//! This crate decides how to provision a container from an image identifier:
//! which platform family it belongs to, which host port forwards to its SSH
//! daemon, which commands install and configure that daemon, and what record
//! ties the resulting node name back to the container in the inventory.

pub mod config;
pub mod domain;
pub mod errors;
pub mod executor;
pub mod inventory;
pub mod provision;
pub mod request;
pub mod service;

// Re-export commonly used types
pub use config::ProvisionerConfig;
pub use errors::{ProvisionError, ProvisionResult};
pub use executor::{CommandExecutor, CommandOutput, ShellExecutor};
pub use inventory::{Inventory, InventoryFile};
pub use request::{Operation, TaskError, TaskRequest, TaskResponse};
pub use service::DockerProvisioner;
