//! Host port allocation for forwarded SSH
//!
//! Candidates are scanned in ascending order. Each candidate takes a fresh
//! container listing; a port is taken when the listing shows `{port}->22`.
//! Allocation and container creation are not atomic, so two concurrent
//! provisioners can pick the same port.

use tracing::{debug, warn};

use crate::errors::{ProvisionError, ProvisionResult};
use crate::executor::CommandExecutor;
use crate::provision::container::list_command;

/// First host port tried
pub const FIRST_PORT: u16 = 2222;

/// Last host port tried (inclusive)
pub const LAST_PORT: u16 = 2230;

/// Whether a container listing shows `port` forwarded to port 22
pub fn port_in_use(listing: &str, port: u16) -> bool {
    listing.contains(&format!("{port}->22"))
}

/// Pick the first free port in `FIRST_PORT..=LAST_PORT`
pub async fn allocate_port<E>(executor: &E, runtime: &str) -> ProvisionResult<u16>
where
    E: CommandExecutor + ?Sized,
{
    warn!("Using private port forwarding");
    allocate_port_in(executor, runtime, FIRST_PORT, LAST_PORT).await
}

/// Pick the first free port in `first..=last`
pub async fn allocate_port_in<E>(
    executor: &E,
    runtime: &str,
    first: u16,
    last: u16,
) -> ProvisionResult<u16>
where
    E: CommandExecutor + ?Sized,
{
    let list = list_command(runtime);

    for port in first..=last {
        let listing = executor.run(&list).await?;
        if !port_in_use(&listing, port) {
            debug!(port, "selected front facing port");
            return Ok(port);
        }
        debug!(port, "port in use");
    }

    Err(ProvisionError::PortRangeExhausted { first, last })
}
