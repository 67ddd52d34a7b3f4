// Copyright (c) 2025 - Cowboy AI, Inc.
//! Provisioner configuration

use tracing::debug;

/// Environment variable naming the container runtime binary
pub const RUNTIME_ENV: &str = "PROVISION_RUNTIME";

/// Environment variable naming the host that forwarded SSH ports bind on
pub const HOSTNAME_ENV: &str = "PROVISION_HOSTNAME";

/// Runtime configuration for the provisioner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionerConfig {
    /// Container runtime CLI (`docker`, or a compatible drop-in)
    pub runtime: String,
    /// Host part of every node URI
    pub hostname: String,
}

impl Default for ProvisionerConfig {
    fn default() -> Self {
        Self {
            runtime: "docker".to_string(),
            hostname: "localhost".to_string(),
        }
    }
}

impl ProvisionerConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let runtime = std::env::var(RUNTIME_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.runtime);

        let hostname = std::env::var(HOSTNAME_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.hostname);

        debug!(%runtime, %hostname, "provisioner configuration loaded");

        Self { runtime, hostname }
    }
}
