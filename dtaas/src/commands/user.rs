//! `admin user add` / `admin user delete` orchestration.
//!
//! Each handler is a sequential pipeline that stops at the first
//! failing step and returns that step's error. Partial application is
//! accepted: rendering overwrites existing service blocks and the
//! workspace copy is merge-only, so re-running `add` converges.

use std::path::{Path, PathBuf};

use tracing::debug;

use dtaas_config::{DtaasConfig, DEFAULT_CONFIG_FILE};
use dtaas_core::error::Result;
use dtaas_core::dtaas_println;
use dtaas_provider::docker::validate_docker_environment;
use dtaas_provider::{
    workspace, DockerCli, RenderContext, UserComposeFile, UserContainers, COMPOSE_USERS_FILE,
};

fn load_config(config_path: Option<PathBuf>) -> Result<DtaasConfig> {
    let path = config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    DtaasConfig::load(&path)
}

pub fn handle_add(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    let mut manifest = UserComposeFile::load(Path::new(COMPOSE_USERS_FILE))?;

    let users = config.add_list()?;
    let server_dns = config.server_dns()?;
    let dtaas_dir = config.path()?;
    let resources = config.get_resource_limits()?;
    debug!("Adding users: {:?}", users);

    manifest.ensure_structure();

    workspace::create_user_files(&users, &Path::new(&dtaas_dir).join("files"))?;

    let ctx = RenderContext {
        server_dns: &server_dns,
        dtaas_dir: &dtaas_dir,
        resources: &resources,
    };
    manifest.merge_users(&users, &ctx)?;
    manifest.save(Path::new(COMPOSE_USERS_FILE))?;

    validate_docker_environment()?;
    let runner = DockerCli;
    UserContainers::new(&runner).start(&manifest.service_names())?;

    dtaas_println!("Users added successfully");
    Ok(())
}

pub fn handle_delete(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    let mut manifest = UserComposeFile::load(Path::new(COMPOSE_USERS_FILE))?;

    let users = config.delete_list()?;
    debug!("Deleting users: {:?}", users);

    validate_docker_environment()?;
    let runner = DockerCli;
    UserContainers::new(&runner).stop(&users)?;

    manifest.remove_users(&users);
    manifest.save(Path::new(COMPOSE_USERS_FILE))?;

    dtaas_println!("Users deleted successfully");
    Ok(())
}
