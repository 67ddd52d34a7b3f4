// Copyright (c) 2025 - Cowboy AI, Inc.
//! SSH Daemon Hardening and Activation
//!
//! Relaxes daemon policy for test access (root login, password auth, no DNS
//! lookups, RSA/DSA host keys only) and then gets the daemon running.
//!
//! # Activation
//!
//! - debian: `service ssh restart`
//! - redhat: `service sshd restart`, unless the container name contains a
//!   `7` or `8`, whose images have no usable init restart path; those launch
//!   `/usr/sbin/sshd -D` detached
//! - fedora, sles, archlinux: `/usr/sbin/sshd -D` detached

use tracing::info;

use crate::domain::Family;
use crate::errors::ProvisionResult;
use crate::executor::CommandExecutor;
use crate::provision::container::Container;

/// Daemon config edits, applied in order
///
/// Each pattern tolerates a commented-out directive.
pub const SSHD_CONFIG_EDITS: [&str; 4] = [
    r#"sed -ri "s/^#?PermitRootLogin .*/PermitRootLogin yes/" /etc/ssh/sshd_config"#,
    r#"sed -ri "s/^#?PasswordAuthentication .*/PasswordAuthentication yes/" /etc/ssh/sshd_config"#,
    r#"sed -ri "s/^#?UseDNS .*/UseDNS no/" /etc/ssh/sshd_config"#,
    // Comment out elliptic-curve host keys
    r#"sed -e "/HostKey.*ssh_host_e.*_key/ s/^#*/#/" -ri /etc/ssh/sshd_config"#,
];

/// Foreground daemon binary
pub const SSHD_FOREGROUND: &str = "/usr/sbin/sshd -D";

/// How the daemon is (re)started once configured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SshActivation {
    /// Restart the named service through the legacy service manager
    ServiceRestart(&'static str),
    /// Launch the daemon in the foreground, detached from `exec`
    DetachedDaemon,
}

impl SshActivation {
    /// Pick the activation strategy for a family and container
    pub fn for_container(family: Family, container_name: &str) -> Self {
        match family {
            Family::Debian => Self::ServiceRestart("ssh"),
            Family::Redhat => {
                if container_name.contains('7') || container_name.contains('8') {
                    Self::DetachedDaemon
                } else {
                    Self::ServiceRestart("sshd")
                }
            }
            Family::Fedora | Family::Sles | Family::Archlinux => Self::DetachedDaemon,
        }
    }

    /// Runtime command performing the activation
    pub fn command(&self, container: &Container) -> String {
        match self {
            Self::ServiceRestart(service) => container.exec(&format!("service {service} restart")),
            Self::DetachedDaemon => container.exec_detached(SSHD_FOREGROUND),
        }
    }
}

/// Full ordered command list for hardening and starting the daemon
pub fn hardening_commands(family: Family, container: &Container) -> Vec<String> {
    let mut commands: Vec<String> = SSHD_CONFIG_EDITS
        .iter()
        .map(|edit| container.exec(edit))
        .collect();
    commands.push(SshActivation::for_container(family, container.name()).command(container));
    commands
}

/// Apply the daemon config edits and (re)start the daemon
pub async fn harden_and_start<E>(
    executor: &E,
    family: Family,
    container: &Container,
) -> ProvisionResult<()>
where
    E: CommandExecutor + ?Sized,
{
    info!(container = %container, family = %family, "hardening ssh daemon");

    for command in hardening_commands(family, container) {
        executor.run(&command).await?;
    }

    Ok(())
}
