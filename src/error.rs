use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::category::Category;

pub type Result<T> = std::result::Result<T, LoggerError>;

/// Failures surfaced by the line source and the classifying logger.
///
/// Decode problems and read timeouts never appear here: the former are
/// repaired in place and the latter are a normal "no line this tick".
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("cannot open serial device {device}: {source}")]
    DeviceUnavailable {
        device: String,
        #[source]
        source: serialport::Error,
    },

    #[error("cannot open log file {}: {source}", path.display())]
    OpenLog {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to append to {category} log: {source}")]
    Write {
        category: Category,
        #[source]
        source: io::Error,
    },

    #[error("failed to flush {category} log: {source}")]
    Flush {
        category: Category,
        #[source]
        source: io::Error,
    },

    #[error("failed to close {category} log: {source}")]
    Close {
        category: Category,
        #[source]
        source: io::Error,
    },

    #[error("failed to read from line source: {0}")]
    Read(#[source] io::Error),

    #[error("logger has already been shut down")]
    Closed,
}
