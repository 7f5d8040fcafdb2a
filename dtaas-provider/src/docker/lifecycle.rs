//! Lifecycle operations for user containers and platform services.
//!
//! Both sides drive the engine through one batched `docker compose`
//! invocation per operation. Exit status is the only result signal;
//! stdio is inherited so the operator sees compose output directly.

// Standard library
use std::fs;
use std::path::{Path, PathBuf};

// External crates
use indexmap::IndexMap;
use tracing::debug;

// Internal imports
use super::command::{ComposeCommand, ComposeRunner};
use super::compose::COMPOSE_USERS_FILE;
use dtaas_config::ServiceEnv;
use dtaas_core::error::{DtaasError, Result};

/// The platform-services compose file name, resolved in the base dir.
pub const COMPOSE_SERVICES_FILE: &str = "compose.services.yml";

/// Services with persistent state under `data/`.
const DATA_SERVICES: &[&str] = &["grafana", "influxdb", "mongodb", "rabbitmq"];

/// Start/stop operations over the user-workspace manifest.
pub struct UserContainers<'a> {
    runner: &'a dyn ComposeRunner,
    compose_file: String,
}

impl<'a> UserContainers<'a> {
    pub fn new(runner: &'a dyn ComposeRunner) -> Self {
        Self::with_compose_file(runner, COMPOSE_USERS_FILE)
    }

    pub fn with_compose_file(runner: &'a dyn ComposeRunner, compose_file: &str) -> Self {
        Self {
            runner,
            compose_file: compose_file.to_string(),
        }
    }

    /// Bring the named containers up detached; all manifest-declared
    /// containers when `users` is empty.
    pub fn start(&self, users: &[String]) -> Result<()> {
        debug!("Starting user containers: {:?}", users);
        let args = ComposeCommand::build_args(&self.compose_file, "up", &["-d"], users);
        self.runner.run(&args, &IndexMap::new())
    }

    /// Stop the named containers; all of them when `users` is empty.
    pub fn stop(&self, users: &[String]) -> Result<()> {
        debug!("Stopping user containers: {:?}", users);
        let args = ComposeCommand::build_args(&self.compose_file, "stop", &[], users);
        self.runner.run(&args, &IndexMap::new())
    }

    /// `ps` passthrough for the named containers.
    pub fn status(&self, users: &[String]) -> Result<()> {
        let args = ComposeCommand::build_args(&self.compose_file, "ps", &[], users);
        self.runner.run(&args, &IndexMap::new())
    }
}

/// Operations over the shared platform-services stack (message broker,
/// time-series database, document database, dashboarding).
pub struct PlatformServices<'a> {
    runner: &'a dyn ComposeRunner,
    base_dir: PathBuf,
    compose_file: String,
    env: IndexMap<String, String>,
}

impl<'a> PlatformServices<'a> {
    /// Resolve the compose file and `config/services.env` under
    /// `base_dir`.
    pub fn new(runner: &'a dyn ComposeRunner, base_dir: &Path) -> Result<Self> {
        let env = ServiceEnv::load(&base_dir.join("config").join("services.env"))?;
        Self::with_env(runner, base_dir, &env)
    }

    /// Like [`PlatformServices::new`] with an already-loaded env.
    pub fn with_env(
        runner: &'a dyn ComposeRunner,
        base_dir: &Path,
        env: &ServiceEnv,
    ) -> Result<Self> {
        let compose_path = base_dir.join(COMPOSE_SERVICES_FILE);
        if !compose_path.exists() {
            return Err(DtaasError::Template(format!(
                "Docker Compose file not found: {}",
                compose_path.display()
            )));
        }
        Ok(Self {
            runner,
            base_dir: base_dir.to_path_buf(),
            compose_file: compose_path.to_string_lossy().into_owned(),
            env: env.compose_env()?,
        })
    }

    fn run(&self, subcommand: &str, extra_args: &[&str], services: &[String]) -> Result<()> {
        let args = ComposeCommand::build_args(&self.compose_file, subcommand, extra_args, services);
        self.runner.run(&args, &self.env)
    }

    pub fn start(&self, services: &[String]) -> Result<String> {
        self.run("up", &["-d"], services)?;
        Ok("Docker Compose started successfully".to_string())
    }

    pub fn stop(&self, services: &[String]) -> Result<String> {
        self.run("stop", &[], services)?;
        Ok("Services stopped successfully".to_string())
    }

    pub fn restart(&self, services: &[String]) -> Result<String> {
        self.run("restart", &[], services)?;
        Ok("Services restarted successfully".to_string())
    }

    /// `ps` passthrough; diagnostics only, output is not parsed.
    pub fn status(&self, services: &[String]) -> Result<()> {
        self.run("ps", &[], services)
    }

    /// Remove services, and with `remove_volumes` also wipe their data
    /// directories so the next start is a fresh install.
    pub fn remove(&self, services: &[String], remove_volumes: bool) -> Result<String> {
        if services.is_empty() {
            let extra: &[&str] = if remove_volumes { &["--volumes"] } else { &[] };
            self.run("down", extra, services)?;
        } else {
            let mut extra = vec!["--stop", "--force"];
            if remove_volumes {
                extra.push("--volumes");
            }
            self.run("rm", &extra, services)?;
        }
        if remove_volumes {
            self.clean_data_directories(services)?;
            Ok("Services and data removed successfully".to_string())
        } else {
            Ok("Services removed successfully".to_string())
        }
    }

    /// Delete and recreate each service's `data/` subdirectory.
    fn clean_data_directories(&self, services: &[String]) -> Result<()> {
        let data_dir = self.base_dir.join("data");
        let subdirs: Vec<String> = if services.is_empty() {
            DATA_SERVICES.iter().map(|s| s.to_string()).collect()
        } else {
            services.to_vec()
        };
        for subdir in subdirs {
            let path = data_dir.join(&subdir);
            if path.exists() {
                fs::remove_dir_all(&path)?;
            }
            fs::create_dir_all(&path)?;
        }
        Ok(())
    }
}
