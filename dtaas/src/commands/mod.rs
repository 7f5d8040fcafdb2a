// Command handlers for DTaaS operations

use tracing::debug;

use crate::cli::{AdminSubcommand, Args, Command, UserSubcommand};
use dtaas_core::error::Result;

pub mod services;
pub mod user;

/// Main command dispatcher
#[must_use = "command execution results should be handled"]
pub fn execute_command(args: Args) -> Result<()> {
    match args.command {
        Command::Admin {
            command: AdminSubcommand::User { command },
        } => match command {
            UserSubcommand::Add => {
                debug!("Handling admin user add");
                user::handle_add(args.config)
            }
            UserSubcommand::Delete => {
                debug!("Handling admin user delete");
                user::handle_delete(args.config)
            }
        },
        Command::Services { command } => {
            debug!("Handling services command");
            services::handle_services_command(&command)
        }
    }
}
