use damviz::core::io::discovery::DiscoveryError;
use damviz::engine::error::EngineError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write CSV report: {0}")]
    Csv(#[from] csv::Error),

    #[error("{failed} of {total} input(s) failed")]
    BatchFailed { failed: usize, total: usize },

    #[error("No structure files found in the given paths")]
    NoInputs,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
