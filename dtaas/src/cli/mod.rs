// CLI argument parsing and definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "dtaas")]
#[command(about = "Commands to help with Digital Twins as a Service")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the dtaas.toml configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Administrative commands for DTaaS
    Admin {
        #[command(subcommand)]
        command: AdminSubcommand,
    },
    /// Manage the shared platform services stack
    Services {
        #[command(subcommand)]
        command: ServicesSubcommand,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum AdminSubcommand {
    /// User management commands
    User {
        #[command(subcommand)]
        command: UserSubcommand,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum UserSubcommand {
    /// Add the users listed in dtaas.toml [users].add
    Add,
    /// Remove the users listed in dtaas.toml [users].delete
    Delete,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ServicesSubcommand {
    /// Start platform services (all when none are named)
    Start {
        /// Service names to start
        services: Vec<String>,
    },
    /// Stop platform services
    Stop {
        /// Service names to stop
        services: Vec<String>,
    },
    /// Restart platform services
    Restart {
        /// Service names to restart
        services: Vec<String>,
    },
    /// Show platform service status
    Status {
        /// Service names to inspect
        services: Vec<String>,
    },
    /// Remove platform services
    Remove {
        /// Service names to remove
        services: Vec<String>,
        /// Also delete and recreate the services' data directories
        #[arg(long)]
        volumes: bool,
    },
}
