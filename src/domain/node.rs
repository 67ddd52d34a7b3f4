// Copyright (c) 2025 - Cowboy AI, Inc.
//! Node Record Value Objects
//!
//! A [`NodeRecord`] is the persisted connection and fact record for one
//! provisioned container, stored in the inventory under its `uri`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{ProvisionError, ProvisionResult};

/// Transport every provisioned node is reached over
pub const TRANSPORT_SSH: &str = "ssh";

/// Provisioner fact recorded on every node this crate creates
pub const PROVISIONER_DOCKER: &str = "docker";

/// SSH login for provisioned nodes
pub const SSH_USER: &str = "root";

/// Root password set during bootstrap (test-fixture convention)
pub const ROOT_PASSWORD: &str = "root";

/// Arbitrary per-node variables supplied with the request
pub type NodeVars = Map<String, Value>;

/// Persisted record for one provisioned node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Node name, `host:port`
    pub uri: String,
    pub config: NodeConfig,
    pub facts: NodeFacts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vars: Option<NodeVars>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    pub transport: String,
    pub ssh: SshSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshSettings {
    pub user: String,
    pub password: String,
    pub port: u16,
    #[serde(rename = "host-key-check")]
    pub host_key_check: bool,
}

/// Facts needed to find the backing container again
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeFacts {
    pub provisioner: String,
    pub container_name: String,
    /// Image identifier exactly as requested
    pub platform: String,
}

/// Node name for a forwarded port
pub fn node_uri(hostname: &str, port: u16) -> String {
    format!("{hostname}:{port}")
}

impl NodeRecord {
    /// Assemble the record for a freshly provisioned container
    pub fn build(
        hostname: &str,
        container_name: impl Into<String>,
        port: u16,
        image: impl Into<String>,
        vars: Option<NodeVars>,
    ) -> Self {
        Self {
            uri: node_uri(hostname, port),
            config: NodeConfig {
                transport: TRANSPORT_SSH.to_string(),
                ssh: SshSettings {
                    user: SSH_USER.to_string(),
                    password: ROOT_PASSWORD.to_string(),
                    port,
                    host_key_check: false,
                },
            },
            facts: NodeFacts {
                provisioner: PROVISIONER_DOCKER.to_string(),
                container_name: container_name.into(),
                platform: image.into(),
            },
            vars,
        }
    }
}

/// Parse the request's YAML-encoded `vars` mapping
///
/// Blank input means no vars. Anything other than a mapping with string keys
/// is rejected.
pub fn parse_vars(raw: Option<&str>) -> ProvisionResult<Option<NodeVars>> {
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return Ok(None);
    };

    let value: Value = serde_yaml::from_str(raw)
        .map_err(|e| ProvisionError::RequestValidation(format!("vars is not valid YAML: {e}")))?;

    match value {
        Value::Null => Ok(None),
        Value::Object(map) => Ok(Some(map)),
        other => Err(ProvisionError::RequestValidation(format!(
            "vars must be a YAML mapping, got {other}"
        ))),
    }
}
