use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorsikaIoError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid file format: {0}")]
    InvalidFormat(String),
    #[error("Unexpected end of file while reading sub-block {position}")]
    UnexpectedEof { position: u64 },
    #[error("Missing required record: {0}")]
    MissingRecord(&'static str),
    #[error("Inconsistent data at sub-block {position}: {message}")]
    Inconsistent { position: u64, message: String },
    #[error("Event index {index} out of range (file has {count} events)")]
    EventOutOfRange { index: usize, count: usize },
    #[error("No event with number {0} in this file")]
    EventNotFound(u32),
}

pub type Result<T> = std::result::Result<T, CorsikaIoError>;
