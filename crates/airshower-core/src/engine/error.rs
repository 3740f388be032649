use thiserror::Error;

use super::config::ConfigError;
use crate::core::histogram::HistogramError;
use crate::core::io::error::CorsikaIoError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read shower file: {0}")]
    Io(#[from] CorsikaIoError),

    #[error("Histogram setup failed: {0}")]
    Histogram(#[from] HistogramError),

    #[error("Failed to read particles of shower {event_number}: {source}")]
    Shower {
        event_number: u32,
        #[source]
        source: CorsikaIoError,
    },
}
