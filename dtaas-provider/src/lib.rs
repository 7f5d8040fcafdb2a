//! Compose manifest synchronization and container lifecycle for DTaaS.
//!
//! The provider layer owns everything between the parsed configuration
//! and the external container engine: rendering per-user service
//! blocks, keeping `compose.users.yml` in sync with the configured
//! accounts, materializing workspace directories, and shelling out to
//! `docker compose` for both the user containers and the shared
//! platform-services stack.

pub mod docker;
pub mod substitute;
pub mod workspace;

pub use docker::command::{ComposeCommand, ComposeRunner, DockerCli};
pub use docker::compose::{RenderContext, UserComposeFile, COMPOSE_USERS_FILE};
pub use docker::lifecycle::{PlatformServices, UserContainers, COMPOSE_SERVICES_FILE};
