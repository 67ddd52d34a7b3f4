// Copyright (c) 2025 - Cowboy AI, Inc.
//! Inventory Persistence
//!
//! The inventory is a group-keyed YAML document listing every provisioned
//! node. It is loaded whole, mutated in memory and rewritten whole; there is
//! no locking, so concurrent runs against one file race (last writer wins).
//!
//! Node entries are kept as raw YAML so that targets written by other tools
//! survive a rewrite untouched.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::domain::{NodeFacts, NodeRecord};
use crate::errors::{ProvisionError, ProvisionResult};

/// File name of the inventory inside the requested directory
pub const INVENTORY_FILE_NAME: &str = "inventory.yaml";

/// Group every SSH-reachable node is appended to
pub const SSH_NODES_GROUP: &str = "ssh_nodes";

/// Inventory format version written for fresh inventories
pub const INVENTORY_VERSION: u32 = 2;

const DEFAULT_GROUPS: [&str; 3] = ["docker_nodes", SSH_NODES_GROUP, "winrm_nodes"];

/// Whole inventory document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub groups: Vec<Group>,
    /// Top-level keys this crate does not interpret
    #[serde(flatten)]
    pub extra: Mapping,
}

/// Named collection of nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    #[serde(default, alias = "nodes")]
    pub targets: Vec<Value>,
    #[serde(flatten)]
    pub extra: Mapping,
}

fn default_version() -> u32 {
    INVENTORY_VERSION
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            targets: Vec::new(),
            extra: Mapping::new(),
        }
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            version: INVENTORY_VERSION,
            groups: DEFAULT_GROUPS
                .iter()
                .map(|name| Group::new(*name))
                .collect(),
            extra: Mapping::new(),
        }
    }
}

/// Name a target entry is addressed by (`uri`, else `name`)
fn target_name(target: &Value) -> Option<&str> {
    target
        .get("uri")
        .or_else(|| target.get("name"))
        .and_then(Value::as_str)
}

impl Inventory {
    /// Append a node record to `group_name`, creating the group if absent
    pub fn add_node(&mut self, record: &NodeRecord, group_name: &str) -> ProvisionResult<()> {
        let entry = serde_yaml::to_value(record)?;

        match self.groups.iter_mut().find(|g| g.name == group_name) {
            Some(group) => group.targets.push(entry),
            None => {
                let mut group = Group::new(group_name);
                group.targets.push(entry);
                self.groups.push(group);
            }
        }

        debug!(node = %record.uri, group = group_name, "node added to inventory");
        Ok(())
    }

    /// Find a node entry by name across all groups
    pub fn find_node(&self, node_name: &str) -> Option<&Value> {
        self.groups
            .iter()
            .flat_map(|g| g.targets.iter())
            .find(|t| target_name(t) == Some(node_name))
    }

    /// Facts of the named node
    pub fn resolve_facts(&self, node_name: &str) -> ProvisionResult<NodeFacts> {
        let node = self
            .find_node(node_name)
            .ok_or_else(|| ProvisionError::NodeNotFound(node_name.to_string()))?;

        let facts = match node.get("facts") {
            Some(facts) => facts.clone(),
            None => {
                let msg = format!("node {node_name} has no facts");
                return Err(ProvisionError::Inventory(msg));
            }
        };

        serde_yaml::from_value(facts).map_err(|e| {
            ProvisionError::Inventory(format!("node {node_name} has unusable facts: {e}"))
        })
    }

    /// Remove the named node from every group, returning how many entries went
    pub fn remove_node(&mut self, node_name: &str) -> usize {
        let mut removed = 0;
        for group in &mut self.groups {
            let before = group.targets.len();
            group.targets.retain(|t| target_name(t) != Some(node_name));
            removed += before - group.targets.len();
        }
        removed
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Total number of node entries across all groups
    pub fn node_count(&self) -> usize {
        self.groups.iter().map(|g| g.targets.len()).sum()
    }
}

/// Location of `inventory.yaml` inside an inventory directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryFile {
    path: PathBuf,
}

impl InventoryFile {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(INVENTORY_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the inventory file is present
    ///
    /// Only a missing path counts as absent; any other metadata error is
    /// reported.
    pub async fn exists(&self) -> ProvisionResult<bool> {
        match tokio::fs::metadata(&self.path).await {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ProvisionError::Inventory(format!(
                "failed to inspect {}: {e}",
                self.path.display()
            ))),
        }
    }

    /// Load the inventory, or start a fresh one if the file does not exist
    pub async fn load_or_default(&self) -> ProvisionResult<Inventory> {
        if !self.exists().await? {
            debug!(path = %self.path.display(), "no inventory yet, starting empty");
            return Ok(Inventory::default());
        }
        self.read().await
    }

    /// Load an inventory that must already exist
    pub async fn load_existing(&self) -> ProvisionResult<Inventory> {
        if !self.exists().await? {
            return Err(ProvisionError::InventoryMissing(self.path.clone()));
        }
        self.read().await
    }

    /// Rewrite the whole inventory file
    pub async fn save(&self, inventory: &Inventory) -> ProvisionResult<()> {
        let yaml = serde_yaml::to_string(inventory)?;
        tokio::fs::write(&self.path, yaml).await.map_err(|e| {
            ProvisionError::Inventory(format!("failed to write {}: {e}", self.path.display()))
        })?;
        debug!(path = %self.path.display(), "inventory written");
        Ok(())
    }

    async fn read(&self) -> ProvisionResult<Inventory> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            ProvisionError::Inventory(format!("failed to read {}: {e}", self.path.display()))
        })?;

        if content.trim().is_empty() {
            return Ok(Inventory::default());
        }

        serde_yaml::from_str(&content).map_err(|e| {
            ProvisionError::Inventory(format!("failed to parse {}: {e}", self.path.display()))
        })
    }
}
