use super::config::ConfigError;
use super::runner::RunnerError;
use crate::core::io::error::TableError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Failed to read residue info '{}': {source}", path.display())]
    ResidueInfo {
        path: PathBuf,
        #[source]
        source: TableError,
    },

    #[error("Failed to write '{}': {source}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: TableError,
    },

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("External command failed: {source}")]
    Runner {
        #[from]
        source: RunnerError,
    },

    #[error("Analysis phase '{phase}' failed: {reason}")]
    PhaseFailed { phase: &'static str, reason: String },

    #[error("Internal logic error: {0}")]
    Internal(String),
}

impl EngineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        EngineError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn export(path: impl Into<PathBuf>, source: TableError) -> Self {
        EngineError::Export {
            path: path.into(),
            source,
        }
    }
}
