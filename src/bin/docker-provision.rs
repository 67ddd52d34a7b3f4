// Copyright (c) 2025 - Cowboy AI, Inc.
//! Docker Provision Task
//!
//! Reads one JSON request from stdin, provisions or tears down a container
//! and prints one JSON record to stdout.
//!
//! ```text
//! {"action":"provision","platform":"debian:9","inventory":"./inv"}
//! {"action":"tear_down","node_name":"localhost:2222","inventory":"./inv"}
//! ```
//!
//! Logs go to stderr; filter with `RUST_LOG`.
//!
//! Environment:
//! - `PROVISION_RUNTIME` - container runtime CLI (default: docker)
//! - `PROVISION_HOSTNAME` - host part of node names (default: localhost)

use anyhow::{Context, Result};
use docker_provision::{
    DockerProvisioner, ProvisionerConfig, ShellExecutor, TaskError, TaskRequest, TaskResponse,
};
use std::io::Read;
use std::process::ExitCode;
use tracing::error;

async fn run() -> Result<TaskResponse> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read request from stdin")?;

    let operation = TaskRequest::from_json(&input)?.validate()?;

    let provisioner = DockerProvisioner::new(ShellExecutor::new(), ProvisionerConfig::from_env());
    let response = provisioner.handle(operation).await?;
    Ok(response)
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => println!("{json}"),
        Err(e) => error!("Failed to encode result: {}", e),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    match run().await {
        Ok(response) => {
            print_json(&response);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            print_json(&TaskError::from_anyhow(&e));
            ExitCode::from(1)
        }
    }
}
