use airshower::core::io::error::CorsikaIoError;
use airshower::core::io::export::ExportError;
use airshower::engine::error::EngineError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] EngineError),

    #[error("Failed to read CORSIKA file '{path}': {source}", path = path.display())]
    Corsika {
        path: PathBuf,
        #[source]
        source: CorsikaIoError,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to render '{path}': {source:#}", path = path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to export histograms: {0}")]
    Export(#[from] ExportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
