//! # Runner Error Types
//!
//! Only I/O on the runner's own streams can fail. A malformed cart input
//! is logged and answered with an empty operation set, not an error.

use std::path::PathBuf;

use thiserror::Error;

/// Runner errors.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The configured input file cannot be opened or read.
    #[error("Failed to read input file: {path}")]
    InputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading stdin failed.
    #[error("Failed to read input from stdin")]
    Stdin(#[source] std::io::Error),

    /// Serializing the result failed.
    #[error("Failed to encode function result")]
    Encode(#[source] serde_json::Error),

    /// Writing the result failed.
    #[error("Failed to write function result")]
    Output(#[source] std::io::Error),
}

/// Convenience type alias for Results with RunnerError.
pub type RunnerResult<T> = Result<T, RunnerError>;
