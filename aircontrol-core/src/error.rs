//! Error types for the aircontrol engine.
//!
//! All fallible operations return [`Result<T>`], which uses [`Error`] as the
//! error type. Configuration, dump format, GPIO backend and I/O failures are
//! all captured here; programming defects (queries before load, unreachable
//! encoder branches) are assertions, not errors.

use crate::dump::DumpError;

/// The error type for all aircontrol operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A missing or invalid task parameter, with the task context and the
    /// name of the offending field.
    #[error("configuration error ({task}): {field} {problem}")]
    Parameter {
        task: String,
        field: &'static str,
        problem: String,
    },

    /// The requested target has no section in the configuration.
    #[error("given target '{0}' cannot be found")]
    UnknownTarget(String),

    /// The configuration file could not be read.
    #[error("configuration error ({path}): {source}")]
    ConfigRead {
        path: String,
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML.
    #[error("configuration error ({path}): {source}")]
    ConfigParse {
        path: String,
        source: toml::de::Error,
    },

    /// A dump file violates the on-disk format.
    #[error(transparent)]
    Dump(#[from] DumpError),

    /// A dump file could not be opened for reading or writing.
    #[error("dump file '{path}' cannot be opened for {action}: {source}")]
    DumpFile {
        path: String,
        action: &'static str,
        source: std::io::Error,
    },

    /// A GPIO backend failure.
    #[error("gpio error: {0}")]
    Gpio(String),

    /// An underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience `Result` alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;
