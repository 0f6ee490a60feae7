use std::io;
use thiserror::Error;

/// Errors surfaced by archive operations.
#[derive(Debug, Error)]
pub enum JournalError {
    /// Underlying open/seek/read/write failure, including short reads.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// A caller-supplied argument was rejected before touching the file.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// `read` was asked for a name the current toc does not hold.
    #[error("no such entry: {0}")]
    NotFound(String),

    /// `compact` requires a prior `load` that inscribed at least one entry.
    #[error("table of contents is empty")]
    EmptyToc,

    /// `load` finished without seeing a single well-formed entry.
    #[error("no entries found")]
    NoEntries,
}

/// Result type alias for archive operations.
pub type Result<T> = std::result::Result<T, JournalError>;
