use thiserror::Error;

use matchday_import::{HarvestError, SettingsError};

/// Errors that can end a CLI run.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Settings could not be resolved
    #[error("Config error: {0}")]
    Settings(#[from] SettingsError),

    /// The harvest could not start
    #[error("{0}")]
    Harvest(#[from] HarvestError),

    /// Store could not be read back
    #[error("Database error: {0}")]
    Database(String),

    /// Runtime creation or async error
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl CliError {
    pub(crate) fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub(crate) fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }
}
