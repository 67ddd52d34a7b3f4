// Copyright (c) 2025 - Cowboy AI, Inc.
//! Provisioning Domain Models
//!
//! # Value Objects
//!
//! - [`Family`] - Normalized OS platform family
//! - [`ImageRef`] - Parsed `image[:tag]` identifier
//! - [`PlatformSpec`] - Family and version resolved from an image
//! - [`NodeRecord`] - Persisted connection and fact record for one node

pub mod node;
pub mod platform;

pub use node::{
    node_uri, parse_vars, NodeConfig, NodeFacts, NodeRecord, NodeVars, SshSettings,
    PROVISIONER_DOCKER, ROOT_PASSWORD, SSH_USER,
};
pub use platform::{
    resolve_family, Family, FamilyRule, ImageRef, Pattern, PlatformSpec, DEFAULT_VERSION,
    FAMILY_RULES,
};
