//! Typed access to the DTaaS configuration sources.
//!
//! Two sources exist: `dtaas.toml` (user administration) and
//! `config/services.env` (platform services environment). Both are
//! loaded once per command invocation into immutable values that get
//! passed into the provider layer by reference.

pub mod config;
pub mod env_file;

pub use config::{DtaasConfig, ResourceLimits, DEFAULT_CONFIG_FILE, LOCALHOST_SERVER};
pub use env_file::ServiceEnv;
