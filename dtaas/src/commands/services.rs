//! `services` subcommand handlers for the shared platform stack.

use std::env;

use dtaas_core::dtaas_println;
use dtaas_core::error::Result;
use dtaas_provider::docker::validate_docker_environment;
use dtaas_provider::{DockerCli, PlatformServices};

use crate::cli::ServicesSubcommand;

pub fn handle_services_command(command: &ServicesSubcommand) -> Result<()> {
    let base_dir = env::current_dir()?;
    validate_docker_environment()?;
    let runner = DockerCli;
    let platform = PlatformServices::new(&runner, &base_dir)?;

    let message = match command {
        ServicesSubcommand::Start { services } => platform.start(services)?,
        ServicesSubcommand::Stop { services } => platform.stop(services)?,
        ServicesSubcommand::Restart { services } => platform.restart(services)?,
        ServicesSubcommand::Status { services } => {
            platform.status(services)?;
            return Ok(());
        }
        ServicesSubcommand::Remove { services, volumes } => platform.remove(services, *volumes)?,
    };

    dtaas_println!("{}", message);
    Ok(())
}
