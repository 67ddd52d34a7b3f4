// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for docker-provision
//!
//! Provides a scripted [`CommandExecutor`] that records every command and
//! answers from a fixed response table, so command sequencing can be
//! asserted without a container runtime.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Mutex;

use docker_provision::{CommandExecutor, CommandOutput, ProvisionResult};

/// Listing header printed by `docker container ls -a`
pub const LISTING_HEADER: &str =
    "CONTAINER ID   IMAGE   COMMAND   CREATED   STATUS   PORTS   NAMES\n";

/// `docker container ls -a` output with the given host ports forwarded to 22
pub fn listing_with_ports(ports: impl IntoIterator<Item = u16>) -> String {
    let mut listing = LISTING_HEADER.to_string();
    for port in ports {
        listing.push_str(&format!(
            "abc{port}   debian:9   \"/bin/bash\"   1 min   Up   0.0.0.0:{port}->22/tcp   debian_9-{port}\n"
        ));
    }
    listing
}

/// Executor answering from a table of `(substring, output)` rules
///
/// The first rule whose substring occurs in the command wins; unmatched
/// commands succeed with empty output.
#[derive(Default)]
pub struct ScriptedExecutor {
    rules: Vec<(String, CommandOutput)>,
    log: Mutex<Vec<String>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer commands containing `pattern` with `stdout`
    pub fn respond(mut self, pattern: &str, stdout: impl Into<String>) -> Self {
        self.rules
            .push((pattern.to_string(), CommandOutput::ok(stdout)));
        self
    }

    /// Fail commands containing `pattern`
    pub fn fail(mut self, pattern: &str, exit_code: i32, stderr: &str) -> Self {
        self.rules.push((
            pattern.to_string(),
            CommandOutput::failed(exit_code, stderr),
        ));
        self
    }

    /// Every command issued so far, in order
    pub fn commands(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    /// Commands containing `needle`
    pub fn commands_containing(&self, needle: &str) -> Vec<String> {
        self.commands()
            .into_iter()
            .filter(|c| c.contains(needle))
            .collect()
    }

    /// Index of the first command containing `needle`
    pub fn position(&self, needle: &str) -> Option<usize> {
        self.commands().iter().position(|c| c.contains(needle))
    }
}

#[async_trait]
impl CommandExecutor for ScriptedExecutor {
    async fn execute(&self, command: &str) -> ProvisionResult<CommandOutput> {
        self.log.lock().unwrap().push(command.to_string());

        let output = self
            .rules
            .iter()
            .find(|(pattern, _)| command.contains(pattern.as_str()))
            .map(|(_, output)| output.clone())
            .unwrap_or_default();

        Ok(output)
    }
}
