//! Container handle
//!
//! Renders runtime CLI invocations against one named container. Nothing here
//! runs a command; callers hand the rendered strings to a
//! [`CommandExecutor`](crate::executor::CommandExecutor).

use std::fmt;

/// Read-only cgroup mount systemd-based Debian/Ubuntu images need
pub const SYSTEMD_CGROUP_VOLUME: &str = "--volume /sys/fs/cgroup:/sys/fs/cgroup:ro";

/// Named container managed through a runtime CLI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    runtime: String,
    name: String,
}

impl Container {
    pub fn new(runtime: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            runtime: runtime.into(),
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run `command` inside the container
    pub fn exec(&self, command: &str) -> String {
        format!("{} exec {} {}", self.runtime, self.name, command)
    }

    /// Start `command` inside the container without waiting for it
    pub fn exec_detached(&self, command: &str) -> String {
        format!("{} exec -d {} {}", self.runtime, self.name, command)
    }

    /// Create and start the container, forwarding `port` to its port 22
    pub fn create(&self, image: &str, port: u16) -> String {
        let volume = systemd_volume_for(image);
        let mut command = format!("{} run -d -it ", self.runtime);
        if let Some(volume) = volume {
            command.push_str(volume);
            command.push(' ');
        }
        command.push_str(&format!(
            "--privileged -p {}:22 --name {} {}",
            port, self.name, image
        ));
        command
    }

    /// Force-remove the container
    pub fn remove(&self) -> String {
        format!("{} rm -f {}", self.runtime, self.name)
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// List all containers, running or not
pub fn list_command(runtime: &str) -> String {
    format!("{runtime} container ls -a")
}

/// Extra volume for images whose init is systemd
///
/// Debian 8 and Ubuntu 14 images predate systemd and get none.
pub fn systemd_volume_for(image: &str) -> Option<&'static str> {
    let deb_family = image.contains("debian") || image.contains("ubuntu");
    let pre_systemd = image.contains("debian8") || image.contains("ubuntu14");

    (deb_family && !pre_systemd).then_some(SYSTEMD_CGROUP_VOLUME)
}
