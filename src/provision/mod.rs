// Copyright (c) 2025 - Cowboy AI, Inc.
//! Provisioning Decision Engine
//!
//! ```text
//! image id ──> PlatformSpec ──┐
//! port scan ──> host port  ───┼──> create container ──> bootstrap ──> harden
//!                             │
//!                 container name = {family}_{version}-{port}
//! ```
//!
//! - [`ports`] - collision-free host port for forwarded SSH
//! - [`bootstrap`] - per-family SSH install sequence
//! - [`harden`] - daemon policy edits and (re)start
//! - [`container`] - runtime command rendering for one container

pub mod bootstrap;
pub mod container;
pub mod harden;
pub mod ports;

pub use bootstrap::{bootstrap_steps, install_ssh, missing_host_keys, BootstrapStep, HostKeyType};
pub use container::{list_command, systemd_volume_for, Container};
pub use harden::{harden_and_start, hardening_commands, SshActivation};
pub use ports::{allocate_port, allocate_port_in, port_in_use, FIRST_PORT, LAST_PORT};
