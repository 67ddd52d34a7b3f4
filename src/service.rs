// Copyright (c) 2025 - Cowboy AI, Inc.
//! Provisioning Service
//!
//! Coordinates the decision engine, the container runtime and the inventory
//! for one request.
//!
//! # Transaction Semantics
//!
//! Each operation is one pass:
//! 1. Load the inventory
//! 2. Run the runtime commands, each to completion, in order
//! 3. Rewrite the inventory
//!
//! The first failure aborts the pass. The container is left in whatever
//! state the last successful command produced and the inventory file is not
//! rewritten.

use std::path::Path;
use tracing::{debug, info, Instrument};
use uuid::Uuid;

use crate::config::ProvisionerConfig;
use crate::domain::{parse_vars, ImageRef, NodeRecord, PlatformSpec};
use crate::errors::ProvisionResult;
use crate::executor::CommandExecutor;
use crate::inventory::{InventoryFile, SSH_NODES_GROUP};
use crate::provision::{allocate_port, harden_and_start, install_ssh, Container};
use crate::request::{Operation, TaskResponse};

/// Provisions and tears down SSH-reachable containers
pub struct DockerProvisioner<E> {
    executor: E,
    config: ProvisionerConfig,
}

impl<E: CommandExecutor> DockerProvisioner<E> {
    pub fn new(executor: E, config: ProvisionerConfig) -> Self {
        Self { executor, config }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Run a validated operation inside a span tagged with a fresh run id
    pub async fn handle(&self, operation: Operation) -> ProvisionResult<TaskResponse> {
        let run_id = Uuid::now_v7();

        match operation {
            Operation::Provision {
                platform,
                inventory,
                vars,
            } => {
                let span = tracing::info_span!("provision", %run_id, %platform);
                let node = self
                    .provision(&platform, &inventory, vars.as_deref())
                    .instrument(span)
                    .await?;
                Ok(TaskResponse::provisioned(node))
            }
            Operation::TearDown {
                node_name,
                inventory,
            } => {
                let span = tracing::info_span!("tear_down", %run_id, node = %node_name);
                self.tear_down(&node_name, &inventory)
                    .instrument(span)
                    .await?;
                Ok(TaskResponse::ok())
            }
        }
    }

    /// Create a container for `platform`, make it reachable over SSH and
    /// record it in the inventory under `ssh_nodes`
    pub async fn provision(
        &self,
        platform: &str,
        inventory_dir: &Path,
        vars: Option<&str>,
    ) -> ProvisionResult<NodeRecord> {
        let vars = parse_vars(vars)?;
        let file = InventoryFile::in_dir(inventory_dir);
        let mut inventory = file.load_or_default().await?;

        let image = ImageRef::parse(platform)?;
        let spec = PlatformSpec::resolve(&image)?;
        let port = allocate_port(&self.executor, &self.config.runtime).await?;
        let container = Container::new(&self.config.runtime, spec.container_name(port));

        info!(container = %container, port, "creating container");
        self.executor
            .run(&container.create(image.as_str(), port))
            .await?;

        install_ssh(&self.executor, &spec, &container).await?;
        harden_and_start(&self.executor, spec.family, &container).await?;

        let node = NodeRecord::build(
            &self.config.hostname,
            container.name(),
            port,
            image.as_str(),
            vars,
        );
        inventory.add_node(&node, SSH_NODES_GROUP)?;
        file.save(&inventory).await?;
        debug!(path = %file.path().display(), "node recorded");

        info!(node = %node.uri, container = %container, "node provisioned");
        Ok(node)
    }

    /// Remove the container behind `node_name` and drop it from the inventory
    pub async fn tear_down(&self, node_name: &str, inventory_dir: &Path) -> ProvisionResult<()> {
        let file = InventoryFile::in_dir(inventory_dir);
        let mut inventory = file.load_existing().await?;

        let facts = inventory.resolve_facts(node_name)?;
        let container = Container::new(&self.config.runtime, facts.container_name);
        self.executor.run(&container.remove()).await?;

        let removed = inventory.remove_node(node_name);
        file.save(&inventory).await?;
        debug!(path = %file.path().display(), removed, "node entries dropped");

        info!("Removed {}", node_name);
        Ok(())
    }
}
