// Copyright (c) 2025 - Cowboy AI, Inc.
//! SSH Bootstrap Sequencing
//!
//! Installs and minimally configures an SSH daemon inside a freshly created
//! container. [`bootstrap_steps`] is a pure function of the platform and
//! returns the ordered in-container steps; [`install_ssh`] executes them.
//!
//! Every sequence ends with the same two steps: create the daemon's runtime
//! directory and reset the root password to the fixture value `root`.

use tracing::{debug, info, warn};

use crate::domain::{Family, PlatformSpec, ROOT_PASSWORD};
use crate::errors::ProvisionResult;
use crate::executor::CommandExecutor;
use crate::provision::container::Container;

/// Directory the daemon config and host keys live in
pub const SSH_DIR: &str = "/etc/ssh/";

/// Disables PAM in the daemon config
pub const DISABLE_PAM: &str = r#"sed -ri "s/^#?UsePAM .*/UsePAM no/" /etc/ssh/sshd_config"#;

/// Host key types generated for RSA/DSA-only daemons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostKeyType {
    Rsa,
    Dsa,
}

impl HostKeyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rsa => "rsa",
            Self::Dsa => "dsa",
        }
    }

    /// Key file name as it appears in `/etc/ssh/`
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Rsa => "ssh_host_rsa_key",
            Self::Dsa => "ssh_host_dsa_key",
        }
    }

    /// Generate the key with an empty passphrase
    pub fn keygen(&self) -> String {
        format!(r#"{} -N """#, self.keygen_interactive())
    }

    /// Generate the key without passing a passphrase
    pub fn keygen_interactive(&self) -> String {
        format!(
            "ssh-keygen -t {} -f {}{}",
            self.as_str(),
            SSH_DIR,
            self.file_name()
        )
    }
}

/// One step of a bootstrap sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapStep {
    /// Command run inside the container
    Exec(String),
    /// Generate each key type not already present in `/etc/ssh/`
    GenerateMissingHostKeys(Vec<HostKeyType>),
}

impl BootstrapStep {
    fn exec(command: impl Into<String>) -> Self {
        Self::Exec(command.into())
    }
}

/// Repairs a corrupted rpm database before installing, for EL6 images
const REDHAT6_RPMDB_RECOVERY: &str = concat!(
    r#"bash -exc "rm -f /var/lib/rpm/__db*; "#,
    "db_verify /var/lib/rpm/Packages; ",
    "rpm --rebuilddb; ",
    "yum clean all; ",
    r#"yum install -y sudo openssh-server openssh-clients""#,
);

/// Ordered in-container steps for a platform
pub fn bootstrap_steps(spec: &PlatformSpec) -> Vec<BootstrapStep> {
    let mut steps = match spec.family {
        Family::Debian => debian_steps(),
        Family::Fedora => fedora_steps(),
        Family::Redhat => redhat_steps(&spec.version),
        Family::Sles => sles_steps(),
        Family::Archlinux => archlinux_steps(),
    };

    steps.push(BootstrapStep::exec("mkdir -p /var/run/sshd"));
    steps.push(BootstrapStep::exec(format!(
        r#"bash -c "echo root:{ROOT_PASSWORD} | /usr/sbin/chpasswd""#
    )));
    steps
}

fn debian_steps() -> Vec<BootstrapStep> {
    vec![
        // Licensed ESM repo, unreachable without a subscription
        BootstrapStep::exec("rm -f /etc/apt/sources.list.d/ubuntu-esm-infra-trusty.list"),
        BootstrapStep::exec("apt-get update"),
        BootstrapStep::exec("apt-get install -y openssh-server openssh-client"),
    ]
}

fn fedora_steps() -> Vec<BootstrapStep> {
    vec![
        BootstrapStep::exec("dnf clean all"),
        BootstrapStep::exec("dnf install -y sudo openssh-server openssh-clients"),
        BootstrapStep::exec("ssh-keygen -A"),
    ]
}

fn redhat_steps(version: &str) -> Vec<BootstrapStep> {
    let install = if version == "6" {
        BootstrapStep::exec(REDHAT6_RPMDB_RECOVERY)
    } else {
        BootstrapStep::exec("yum install -y sudo openssh-server openssh-clients")
    };

    vec![
        install,
        BootstrapStep::GenerateMissingHostKeys(vec![HostKeyType::Rsa, HostKeyType::Dsa]),
    ]
}

fn sles_steps() -> Vec<BootstrapStep> {
    vec![
        BootstrapStep::exec("zypper -n in openssh"),
        BootstrapStep::exec(HostKeyType::Rsa.keygen_interactive()),
        BootstrapStep::exec(HostKeyType::Dsa.keygen_interactive()),
        BootstrapStep::exec(DISABLE_PAM),
    ]
}

fn archlinux_steps() -> Vec<BootstrapStep> {
    vec![
        BootstrapStep::exec("pacman --noconfirm -Sy archlinux-keyring"),
        BootstrapStep::exec("pacman --noconfirm -Syu"),
        BootstrapStep::exec("pacman -S --noconfirm openssh"),
        BootstrapStep::exec("ssh-keygen -A"),
        BootstrapStep::exec(DISABLE_PAM),
        BootstrapStep::exec("systemctl enable sshd"),
    ]
}

/// Key types from `wanted` whose file is absent from an `ls /etc/ssh/` listing
pub fn missing_host_keys(listing: &str, wanted: &[HostKeyType]) -> Vec<HostKeyType> {
    wanted
        .iter()
        .copied()
        .filter(|key| !listing.contains(key.file_name()))
        .collect()
}

/// Install and configure the SSH daemon inside `container`
///
/// Steps run strictly in order; the first failing command aborts the run.
pub async fn install_ssh<E>(
    executor: &E,
    spec: &PlatformSpec,
    container: &Container,
) -> ProvisionResult<()>
where
    E: CommandExecutor + ?Sized,
{
    if spec.family == Family::Debian {
        warn!("Disabling ESM security updates for ubuntu - no access without privilege");
    }

    info!(container = %container, family = %spec.family, version = %spec.version, "installing ssh");

    for step in bootstrap_steps(spec) {
        match step {
            BootstrapStep::Exec(command) => {
                executor.run(&container.exec(&command)).await?;
            }
            BootstrapStep::GenerateMissingHostKeys(wanted) => {
                let listing = executor
                    .run(&container.exec(&format!("ls {SSH_DIR}")))
                    .await?;
                for key in missing_host_keys(&listing, &wanted) {
                    executor.run(&container.exec(&key.keygen())).await?;
                }
                debug!(container = %container, "host keys present");
            }
        }
    }

    Ok(())
}
