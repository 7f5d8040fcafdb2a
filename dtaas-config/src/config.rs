// Standard library
use std::fs;
use std::path::Path;

// External crates
use toml::{Table, Value};
use tracing::debug;

// Internal imports
use dtaas_core::error::{DtaasError, Result};

/// Sentinel `server-dns` value selecting the localhost template.
pub const LOCALHOST_SERVER: &str = "localhost";

/// Default configuration file discovered in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "dtaas.toml";

/// Resource limits applied to every user workspace container.
///
/// All four fields are required in `[common.resources]`. Values are
/// carried as strings end to end; numeric TOML values are coerced on
/// read and range validation is left to the container engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLimits {
    pub shm_size: String,
    pub cpus: String,
    pub mem_limit: String,
    pub pids_limit: String,
}

/// Validated accessor over a parsed `dtaas.toml`.
///
/// Loaded once at the start of a command invocation and immutable
/// thereafter; every getter is repeatable and side-effect free.
#[derive(Debug, Clone)]
pub struct DtaasConfig {
    data: Table,
}

impl DtaasConfig {
    /// Read and parse the configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| {
            DtaasError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let data: Table = content.parse().map_err(|e| {
            DtaasError::Config(format!("failed to parse {}: {}", path.display(), e))
        })?;
        Ok(Self { data })
    }

    /// Build an accessor over an already-parsed table. Used by tests.
    pub fn from_table(data: Table) -> Self {
        Self { data }
    }

    fn section(&self, name: &str) -> Result<&Table> {
        self.data
            .get(name)
            .ok_or_else(|| DtaasError::Config(format!("missing [{}] section", name)))?
            .as_table()
            .ok_or_else(|| DtaasError::Config(format!("[{}] is not a section", name)))
    }

    /// Non-empty string value of `section.key`.
    pub fn get_string(&self, section: &str, key: &str) -> Result<String> {
        let value = self.section(section)?.get(key).ok_or_else(|| {
            DtaasError::Config(format!("{}.{} not set in TOML", section, key))
        })?;
        let s = match value {
            Value::String(s) => s.clone(),
            Value::Integer(n) => n.to_string(),
            Value::Float(n) => n.to_string(),
            _ => {
                return Err(DtaasError::Config(format!(
                    "{}.{} is not a string",
                    section, key
                )))
            }
        };
        if s.is_empty() {
            return Err(DtaasError::Config(format!(
                "{}.{} is empty",
                section, key
            )));
        }
        Ok(s)
    }

    /// Non-empty ordered list of strings at `section.key`.
    ///
    /// An absent key and a present-but-empty list are distinct errors:
    /// the former means "not configured", the latter is a mistake the
    /// operator should hear about instead of a silent no-op.
    pub fn get_string_list(&self, section: &str, key: &str) -> Result<Vec<String>> {
        let value = self.section(section)?.get(key).ok_or_else(|| {
            DtaasError::Config(format!("no {} list in [{}]", key, section))
        })?;
        let items = value.as_array().ok_or_else(|| {
            DtaasError::Config(format!("{}.{} is not a list", section, key))
        })?;
        if items.is_empty() {
            return Err(DtaasError::Config(format!(
                "{}.{} list is empty",
                section, key
            )));
        }
        items.iter().map(coerce_to_string).collect()
    }

    /// The four required resource limits from `[common.resources]`.
    pub fn get_resource_limits(&self) -> Result<ResourceLimits> {
        let common = self.section("common")?;
        let resources = common
            .get("resources")
            .and_then(Value::as_table)
            .ok_or_else(|| {
                DtaasError::Config("missing default resource limits ([common.resources])".into())
            })?;
        let field = |key: &str| -> Result<String> {
            resources
                .get(key)
                .ok_or_else(|| {
                    DtaasError::Config(format!("common.resources.{} not set in TOML", key))
                })
                .and_then(coerce_to_string)
        };
        Ok(ResourceLimits {
            shm_size: field("shm_size")?,
            cpus: field("cpus")?,
            mem_limit: field("mem_limit")?,
            pids_limit: field("pids_limit")?,
        })
    }

    /// Workspace root under which all user directories live.
    pub fn path(&self) -> Result<String> {
        self.get_string("common", "path")
    }

    /// `localhost` or the deployment's real hostname.
    pub fn server_dns(&self) -> Result<String> {
        self.get_string("common", "server-dns")
    }

    /// User names to add, from `[users] add`.
    pub fn add_list(&self) -> Result<Vec<String>> {
        self.get_string_list("users", "add")
    }

    /// User names to delete, from `[users] delete`.
    pub fn delete_list(&self) -> Result<Vec<String>> {
        self.get_string_list("users", "delete")
    }
}

fn coerce_to_string(value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Integer(n) => Ok(n.to_string()),
        Value::Float(n) => Ok(n.to_string()),
        Value::Boolean(b) => Ok(b.to_string()),
        _ => Err(DtaasError::Config(
            "value cannot be coerced to a string".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(toml: &str) -> DtaasConfig {
        DtaasConfig::from_table(toml.parse().unwrap())
    }

    fn full_config() -> DtaasConfig {
        config(
            r#"
            [common]
            path = "/srv/dtaas"
            server-dns = "localhost"

            [common.resources]
            shm_size = "512m"
            cpus = 4
            mem_limit = "4G"
            pids_limit = 4960

            [users]
            add = ["alice", "bob"]
            delete = ["carol"]
            "#,
        )
    }

    #[test]
    fn string_getters() {
        let cfg = full_config();
        assert_eq!(cfg.path().unwrap(), "/srv/dtaas");
        assert_eq!(cfg.server_dns().unwrap(), "localhost");
    }

    #[test]
    fn missing_key_is_an_error() {
        let cfg = config("[common]\npath = \"/srv\"\n");
        let err = cfg.server_dns().unwrap_err();
        assert!(err.to_string().contains("server-dns"));
    }

    #[test]
    fn empty_string_is_an_error() {
        let cfg = config("[common]\npath = \"\"\n");
        assert!(cfg.path().is_err());
    }

    #[test]
    fn wrong_type_is_an_error() {
        let cfg = config("[common]\npath = [\"/srv\"]\n");
        assert!(cfg.path().is_err());
    }

    #[test]
    fn string_lists_preserve_order_and_coerce() {
        let cfg = config("[users]\nadd = [\"alice\", 42]\n");
        assert_eq!(cfg.add_list().unwrap(), vec!["alice", "42"]);
    }

    #[test]
    fn empty_list_error_is_distinct_from_absent_key() {
        let cfg = config("[users]\nadd = []\n");
        let empty = cfg.add_list().unwrap_err().to_string();
        let absent = cfg.delete_list().unwrap_err().to_string();
        assert!(empty.contains("list is empty"));
        assert!(absent.contains("no delete list"));
        assert_ne!(empty, absent);
    }

    #[test]
    fn resource_limits_are_coerced_to_strings() {
        let limits = full_config().get_resource_limits().unwrap();
        assert_eq!(
            limits,
            ResourceLimits {
                shm_size: "512m".into(),
                cpus: "4".into(),
                mem_limit: "4G".into(),
                pids_limit: "4960".into(),
            }
        );
    }

    #[test]
    fn missing_resources_section_is_an_error() {
        let cfg = config("[common]\npath = \"/srv\"\n");
        assert!(cfg.get_resource_limits().is_err());
    }

    #[test]
    fn load_reads_the_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dtaas.toml");
        std::fs::write(&path, "[common]\npath = \"/srv/dtaas\"\n").unwrap();
        let cfg = DtaasConfig::load(&path).unwrap();
        assert_eq!(cfg.path().unwrap(), "/srv/dtaas");
    }

    #[test]
    fn load_reports_missing_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = DtaasConfig::load(&dir.path().join("dtaas.toml")).unwrap_err();
        assert!(missing.to_string().contains("failed to read"));

        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[common\npath=").unwrap();
        let malformed = DtaasConfig::load(&path).unwrap_err();
        assert!(malformed.to_string().contains("failed to parse"));
    }

    #[test]
    fn getters_are_repeatable() {
        let cfg = full_config();
        assert_eq!(cfg.add_list().unwrap(), cfg.add_list().unwrap());
    }
}
