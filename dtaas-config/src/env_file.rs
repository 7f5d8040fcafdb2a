// Standard library
use std::path::Path;

// External crates
use indexmap::IndexMap;
use tracing::debug;

// Internal imports
use dtaas_core::error::{DtaasError, Result};

/// Environment for the platform-services compose project, loaded from
/// `config/services.env`.
///
/// The variables are handed to the container engine's subprocess
/// explicitly; nothing here mutates the process environment.
#[derive(Debug, Clone)]
pub struct ServiceEnv {
    vars: IndexMap<String, String>,
}

impl ServiceEnv {
    /// Load the env file, preserving declaration order.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DtaasError::Config(format!(
                "configuration file not found: {}\n\
                 Copy config/services.env.template to config/services.env \
                 and update it with your configuration",
                path.display()
            )));
        }
        let mut vars = IndexMap::new();
        let entries = dotenvy::from_path_iter(path).map_err(|e| {
            DtaasError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        for entry in entries {
            let (key, value) = entry.map_err(|e| {
                DtaasError::Config(format!("failed to parse {}: {}", path.display(), e))
            })?;
            vars.insert(key, value);
        }
        debug!("Loaded services environment from {}", path.display());
        Ok(Self { vars })
    }

    /// Build directly from a variable map. Used by tests.
    pub fn from_vars(vars: IndexMap<String, String>) -> Self {
        Self { vars }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Compose project name derived from the required `HOSTNAME` value.
    pub fn project_name(&self) -> Result<String> {
        let hostname = self.get("HOSTNAME").ok_or_else(|| {
            DtaasError::Config("HOSTNAME must be set in services.env".into())
        })?;
        Ok(hostname.to_lowercase().replace(['.', '_'], "-"))
    }

    /// Full variable map for the compose subprocess, including the
    /// derived `COMPOSE_PROJECT_NAME`.
    pub fn compose_env(&self) -> Result<IndexMap<String, String>> {
        let mut env = self.vars.clone();
        env.insert("COMPOSE_PROJECT_NAME".into(), self.project_name()?);
        Ok(env)
    }
}
