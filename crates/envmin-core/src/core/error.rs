use std::path::{Path, PathBuf};
use thiserror::Error;

pub type EnvminResult<T> = Result<T, EnvminError>;

#[derive(Error, Debug)]
pub enum EnvminError {
    /// A required path is missing, has the wrong type, or an option was not supplied.
    #[error("{0}")]
    Precondition(String),

    /// The external build returned non-zero or could not be launched.
    #[error("{message}")]
    ExternalBuild {
        message: String,
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    /// The dependency resolver could not compute the closure.
    #[error("Dependency resolution failed: {0:#}")]
    Resolution(#[source] anyhow::Error),

    #[error("Filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("WalkDir error: {0}")]
    WalkDir(#[from] walkdir::Error),
}

impl EnvminError {
    /// Wrap an I/O failure together with the path it happened on.
    pub fn fs(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        EnvminError::Filesystem {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Prefix the message of a build failure, e.g. "failed building input environment".
    ///
    /// Other variants are returned unchanged.
    pub fn with_build_context(self, context: &str) -> Self {
        match self {
            EnvminError::ExternalBuild {
                message,
                exit_code,
                stdout,
                stderr,
            } => EnvminError::ExternalBuild {
                message: format!("{}: {}", context, message),
                exit_code,
                stdout,
                stderr,
            },
            other => other,
        }
    }

    /// True for failures caused by how the tool was invoked rather than by execution.
    pub fn is_invocation_error(&self) -> bool {
        matches!(self, EnvminError::Precondition(_))
    }
}
