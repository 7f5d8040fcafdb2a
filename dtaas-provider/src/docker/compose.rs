//! The user-workspace compose manifest and per-user service rendering.
//!
//! `compose.users.yml` is the single shared mutable resource of the
//! CLI: read once, mutated in memory, written back in full. A missing
//! file means "no manifest yet", not an error. Single-writer usage is
//! assumed; concurrent invocations against the same file are out of
//! scope.

// Standard library
use std::fmt;
use std::fs;
use std::path::Path;

// External crates
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml_ng::{Mapping, Value};
use tracing::debug;

// Internal imports
use crate::substitute::{substitute, TokenMap};
use dtaas_config::{ResourceLimits, LOCALHOST_SERVER};
use dtaas_core::error::{DtaasError, Result};

/// The persisted user-workspace manifest file name.
pub const COMPOSE_USERS_FILE: &str = "compose.users.yml";

const LOCAL_TEMPLATE_FILE: &str = "users.local.yml";
const SERVER_TEMPLATE_FILE: &str = "users.server.yml";
const LOCAL_TEMPLATE: &str = include_str!("../../templates/users.local.yml");
const SERVER_TEMPLATE: &str = include_str!("../../templates/users.server.yml");

// Compose files in the wild carry `version: 3` as a bare number just
// as often as a string; accept both.
fn deserialize_option_string_or_number<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{Error, Visitor};

    struct StringOrNumberVisitor;

    impl<'de> Visitor<'de> for StringOrNumberVisitor {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, number, or null")
        }

        fn visit_none<E: Error>(self) -> std::result::Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: Error>(self) -> std::result::Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_str<E: Error>(self, value: &str) -> std::result::Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_i64<E: Error>(self, value: i64) -> std::result::Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_u64<E: Error>(self, value: u64) -> std::result::Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_f64<E: Error>(self, value: f64) -> std::result::Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_some<D2: Deserializer<'de>>(
            self,
            deserializer: D2,
        ) -> std::result::Result<Self::Value, D2::Error> {
            deserializer.deserialize_any(StringOrNumberVisitor)
        }
    }

    deserializer.deserialize_option(StringOrNumberVisitor)
}

/// Inputs for rendering one user's service block.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// `localhost` or the deployment hostname; selects the template.
    pub server_dns: &'a str,
    /// Workspace root substituted for `${DTAAS_DIR}`.
    pub dtaas_dir: &'a str,
    pub resources: &'a ResourceLimits,
}

/// The user-workspace compose manifest.
///
/// Top-level keys other than `version`/`services`/`networks` survive a
/// load/store round trip untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserComposeFile {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_option_string_or_number"
    )]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services: Option<IndexMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub networks: Option<IndexMap<String, Value>>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl UserComposeFile {
    /// Load the manifest from disk. A missing or empty file is an
    /// empty manifest, not an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No manifest at {}, starting empty", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml_ng::from_str(&content).map_err(|e| {
            DtaasError::Template(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// Persist the full manifest. No partial writes.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml_ng::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Fill in defaults for missing top-level keys, never overwriting
    /// pre-existing values.
    pub fn ensure_structure(&mut self) {
        if self.version.is_none() {
            self.version = Some("3".to_string());
        }
        if self.services.is_none() {
            self.services = Some(IndexMap::new());
        }
        if self.networks.is_none() {
            let mut users = Mapping::new();
            users.insert("name".into(), "dtaas-users".into());
            users.insert("external".into(), Value::Bool(true));
            let mut networks = IndexMap::new();
            networks.insert("users".to_string(), Value::Mapping(users));
            self.networks = Some(networks);
        }
    }

    /// Names of every declared service, in manifest order.
    pub fn service_names(&self) -> Vec<String> {
        self.services
            .as_ref()
            .map(|s| s.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Render and insert a service block for each user, overwriting
    /// blocks that already exist.
    ///
    /// All blocks are rendered into a staging map before any is
    /// applied, so a rendering failure partway through the list leaves
    /// the manifest untouched.
    pub fn merge_users(&mut self, users: &[String], ctx: &RenderContext) -> Result<()> {
        self.merge_users_with(users, |username| render_service(username, ctx))
    }

    pub(crate) fn merge_users_with<F>(&mut self, users: &[String], mut render: F) -> Result<()>
    where
        F: FnMut(&str) -> Result<Value>,
    {
        let mut staged = IndexMap::with_capacity(users.len());
        for username in users {
            staged.insert(username.clone(), render(username)?);
        }
        let services = self.services.get_or_insert_with(IndexMap::new);
        for (username, block) in staged {
            services.insert(username, block);
        }
        Ok(())
    }

    /// Delete each listed service if present. Unknown names are a
    /// silent no-op.
    pub fn remove_users(&mut self, users: &[String]) {
        if let Some(services) = self.services.as_mut() {
            for username in users {
                services.shift_remove(username);
            }
        }
    }
}

/// Render one user's service block from the template matching the
/// deployment target.
pub fn render_service(username: &str, ctx: &RenderContext) -> Result<Value> {
    let template = load_template(ctx.server_dns)?;
    let mapping = token_mapping(username, ctx);
    substitute(&template, &mapping)
}

/// Load the template fresh per render: the working-directory copy when
/// the operator ships one, the embedded default otherwise.
fn load_template(server_dns: &str) -> Result<Value> {
    let (file, embedded) = if server_dns == LOCALHOST_SERVER {
        (LOCAL_TEMPLATE_FILE, LOCAL_TEMPLATE)
    } else {
        (SERVER_TEMPLATE_FILE, SERVER_TEMPLATE)
    };
    let content = if Path::new(file).exists() {
        fs::read_to_string(file)
            .map_err(|e| DtaasError::Template(format!("failed to read {}: {}", file, e)))?
    } else {
        embedded.to_string()
    };
    serde_yaml_ng::from_str(&content)
        .map_err(|e| DtaasError::Template(format!("failed to parse {}: {}", file, e)))
}

fn token_mapping(username: &str, ctx: &RenderContext) -> TokenMap {
    let mut mapping = TokenMap::new();
    mapping.insert("${DTAAS_DIR}".to_string(), ctx.dtaas_dir.to_string());
    mapping.insert("${username}".to_string(), username.to_string());
    mapping.insert("${shm_size}".to_string(), ctx.resources.shm_size.clone());
    mapping.insert("${cpus}".to_string(), ctx.resources.cpus.clone());
    mapping.insert("${mem_limit}".to_string(), ctx.resources.mem_limit.clone());
    mapping.insert(
        "${pids_limit}".to_string(),
        ctx.resources.pids_limit.clone(),
    );
    if ctx.server_dns != LOCALHOST_SERVER {
        mapping.insert("${SERVER_DNS}".to_string(), ctx.server_dns.to_string());
    }
    mapping
}
