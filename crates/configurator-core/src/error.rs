//! Error types for the configurator engine

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the configuration and materialization steps
///
/// Invalid answers never show up here: the prompter re-asks until it gets a
/// usable one. What remains is cancellation, missing template inputs, and
/// filesystem failures.
#[derive(Error, Debug)]
pub enum ConfigureError {
    /// Input ended while a question was waiting for an answer
    #[error("configuration aborted: no more input")]
    Aborted,

    /// Reading from or writing to the terminal failed
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    /// A template or fragment file the run depends on does not exist
    #[error("required template file is missing: {}", path.display())]
    MissingTemplate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Any other read, write, copy, rename or delete failure
    #[error("failed to update {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The layout override file exists but could not be parsed
    #[error("invalid template layout in {}: {source}", path.display())]
    Layout {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Session steps were invoked out of order
    #[error("{0}")]
    OutOfOrder(&'static str),
}

impl ConfigureError {
    /// Wrap a read failure, treating "not found" as a missing template file
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            ConfigureError::MissingTemplate { path, source }
        } else {
            ConfigureError::Filesystem { path, source }
        }
    }

    /// Wrap a write, rename or delete failure
    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ConfigureError::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// True when the operator ended input instead of answering
    pub fn is_aborted(&self) -> bool {
        matches!(self, ConfigureError::Aborted)
    }
}

/// Result alias for configurator operations
pub type Result<T> = std::result::Result<T, ConfigureError>;
