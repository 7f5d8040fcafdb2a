//! Docker compose command abstraction.
//!
//! Every external invocation goes through [`ComposeRunner`] so the
//! lifecycle operations can be exercised in tests without a container
//! engine. One batched invocation covers all named services; there is
//! no per-service retry or partial-success reporting.

use std::process::Command;

use indexmap::IndexMap;
use tracing::debug;

use dtaas_core::error::{DtaasError, Result};

/// Helper for building `docker compose` argument vectors.
pub struct ComposeCommand;

impl ComposeCommand {
    /// Build compose arguments scoped to an optional service list.
    ///
    /// `extra_args` come before the service names, matching the
    /// compose grammar (`up -d <services...>`).
    pub fn build_args(
        compose_file: &str,
        subcommand: &str,
        extra_args: &[&str],
        services: &[String],
    ) -> Vec<String> {
        let mut args = vec![
            "compose".to_string(),
            "-f".to_string(),
            compose_file.to_string(),
            subcommand.to_string(),
        ];
        args.extend(extra_args.iter().map(|s| s.to_string()));
        args.extend(services.iter().cloned());
        args
    }
}

/// Narrow seam over the container engine subprocess.
pub trait ComposeRunner {
    /// Run `docker <args>` to completion, inheriting stdio so the
    /// operator sees compose progress. Nonzero exit is one aggregate
    /// error naming the attempted command.
    fn run(&self, args: &[String], env: &IndexMap<String, String>) -> Result<()>;
}

/// Production runner shelling out to the `docker` binary.
#[derive(Debug, Default)]
pub struct DockerCli;

impl ComposeRunner for DockerCli {
    fn run(&self, args: &[String], env: &IndexMap<String, String>) -> Result<()> {
        let full_command = format!("docker {}", args.join(" "));
        debug!("Executing: {}", full_command);

        let status = Command::new("docker")
            .args(args)
            .envs(env)
            .status()
            .map_err(|e| {
                DtaasError::Command(format!("failed to execute '{}': {}", full_command, e))
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(DtaasError::Command(format!(
                "failed to run '{}' (exit status: {})",
                full_command, status
            )))
        }
    }
}
