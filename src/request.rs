// Copyright (c) 2025 - Cowboy AI, Inc.
//! Task Request Envelope
//!
//! A run is driven by one JSON request read from stdin and answers with one
//! JSON record on stdout: a [`TaskResponse`] on success or a [`TaskError`]
//! on failure.

use serde::{Deserialize, Serialize};
use std::backtrace::BacktraceStatus;
use std::path::PathBuf;

use crate::domain::NodeRecord;
use crate::errors::{ProvisionError, ProvisionResult};

/// Error kind reported for every failure
pub const ERROR_KIND: &str = "provision/docker_failure";

/// Requested action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Provision,
    TearDown,
    #[serde(other)]
    Unknown,
}

/// Raw request as received
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRequest {
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub action: Option<Action>,
    #[serde(default)]
    pub node_name: Option<String>,
    /// Directory holding `inventory.yaml`; defaults to the working directory
    #[serde(default)]
    pub inventory: Option<PathBuf>,
    /// YAML-encoded mapping attached to a provisioned node
    #[serde(default)]
    pub vars: Option<String>,
}

/// Validated operation, ready to dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Provision {
        platform: String,
        inventory: PathBuf,
        vars: Option<String>,
    },
    TearDown {
        node_name: String,
        inventory: PathBuf,
    },
}

fn invalid(msg: &str) -> ProvisionError {
    ProvisionError::RequestValidation(msg.to_string())
}

impl TaskRequest {
    pub fn from_json(input: &str) -> ProvisionResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ProvisionError::RequestValidation(format!("invalid request: {e}")))
    }

    /// Check field combinations and produce the operation to run
    ///
    /// Exactly one of `node_name` and `platform` may be set, whatever the
    /// action.
    pub fn validate(self) -> ProvisionResult<Operation> {
        let action = self.action.unwrap_or(Action::Unknown);

        if action == Action::TearDown && self.node_name.is_none() {
            return Err(invalid("specify a node_name when tearing down"));
        }
        if action == Action::Provision && self.platform.is_none() {
            return Err(invalid("specify a platform when provisioning"));
        }
        if self.node_name.is_some() == self.platform.is_some() {
            return Err(invalid(match action {
                Action::TearDown => "specify only a node_name, not platform, when tearing down",
                Action::Provision => "specify only a platform, not node_name, when provisioning",
                Action::Unknown => "specify only one of: node_name, platform",
            }));
        }

        let inventory = self.inventory.unwrap_or_else(|| PathBuf::from("."));

        match (action, self.platform, self.node_name) {
            (Action::Provision, Some(platform), None) => Ok(Operation::Provision {
                platform,
                inventory,
                vars: self.vars,
            }),
            (Action::TearDown, None, Some(node_name)) => Ok(Operation::TearDown {
                node_name,
                inventory,
            }),
            _ => Err(invalid("unknown action")),
        }
    }
}

/// Success record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<NodeRecord>,
}

impl TaskResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            node_name: None,
            node: None,
        }
    }

    pub fn provisioned(node: NodeRecord) -> Self {
        Self {
            status: "ok".to_string(),
            node_name: Some(node.uri.clone()),
            node: Some(node),
        }
    }
}

/// Failure record, `{"_error": {...}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskError {
    #[serde(rename = "_error")]
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub kind: String,
    pub msg: String,
    pub backtrace: Vec<String>,
}

impl TaskError {
    /// Describe an error chain
    ///
    /// `backtrace` lists every cause, followed by stack frames when backtrace
    /// capture is enabled through `RUST_BACKTRACE` or `RUST_LIB_BACKTRACE`.
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let mut backtrace: Vec<String> = err.chain().map(|cause| cause.to_string()).collect();

        let trace = err.backtrace();
        if trace.status() == BacktraceStatus::Captured {
            backtrace.extend(trace.to_string().lines().map(|l| l.trim_end().to_string()));
        }

        Self {
            error: ErrorDetail {
                kind: ERROR_KIND.to_string(),
                msg: err.to_string(),
                backtrace,
            },
        }
    }
}
