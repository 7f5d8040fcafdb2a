// Docker compose orchestration split into logical modules

pub mod command;
pub mod compose;
pub mod lifecycle;


pub use command::{ComposeCommand, ComposeRunner, DockerCli};
pub use compose::{RenderContext, UserComposeFile};
pub use lifecycle::{PlatformServices, UserContainers};

// Standard library
use std::process::Command;

// Internal imports
use dtaas_core::error::{DtaasError, Result};

/// Check that docker is installed, the daemon is reachable, and the
/// current user may talk to it. Run before any lifecycle operation so
/// the operator gets an actionable message instead of compose noise.
pub fn validate_docker_environment() -> Result<()> {
    let installed = Command::new("docker")
        .arg("--version")
        .status()
        .map(|status| status.success())
        .unwrap_or(false);
    if !installed {
        return Err(DtaasError::Command(
            "docker is not installed. Install from: https://docs.docker.com/get-docker/".into(),
        ));
    }

    let output = Command::new("docker").arg("ps").output()?;
    if !output.status.success() {
        if String::from_utf8_lossy(&output.stderr).contains("permission denied") {
            return Err(DtaasError::DockerPermission);
        }
        return Err(DtaasError::DockerNotRunning);
    }

    Ok(())
}
