pub use anyhow::bail;
use std::fmt::{self, Display, Formatter};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DtaasError {
    Config(String),
    Template(String),
    Substitution(String),
    Io(#[from] std::io::Error),
    Command(String),
    Serialization(String),
    DockerNotRunning,
    DockerPermission,
    Other(#[from] anyhow::Error),
}

impl Display for DtaasError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            DtaasError::Config(s) => write!(f, "Configuration error: {}", s),
            DtaasError::Template(s) => write!(f, "Template error: {}", s),
            DtaasError::Substitution(s) => write!(f, "Substitution failed: {}", s),
            DtaasError::Io(e) => write!(f, "I/O error: {}", e),
            DtaasError::Command(s) => write!(f, "Command failed: {}", s),
            DtaasError::Serialization(s) => write!(f, "Serialization error: {}", s),
            DtaasError::DockerNotRunning => {
                write!(f, "Docker daemon is not running\n\n")?;
                write!(f, "Fix:\n")?;
                write!(f, "  • Start Docker Desktop, or\n")?;
                write!(f, "  • Run: sudo systemctl start docker\n")?;
                write!(f, "  • Verify: docker ps")
            }
            DtaasError::DockerPermission => {
                write!(f, "Permission denied accessing Docker\n\n")?;
                write!(f, "Fix:\n")?;
                write!(f, "  • Add user to docker group: sudo usermod -aG docker $USER\n")?;
                write!(f, "  • Log out and back in")
            }
            DtaasError::Other(e) => write!(f, "Other error: {}", e),
        }
    }
}

impl From<serde_yaml_ng::Error> for DtaasError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        DtaasError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DtaasError>;
