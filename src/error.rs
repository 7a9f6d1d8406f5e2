//! Error types
//!
//! Errors surfaced by application lifecycle operations. Routing misses on the
//! dispatch path are never reported here; they are counted in
//! [`DispatchStats`](crate::stats::DispatchStats) instead.

use tokio::task::JoinError;

use crate::registry::RegistryError;
use crate::stream::StreamId;

/// Result type for application operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for application operations
#[derive(Debug, Clone)]
pub enum Error {
    /// Stream registry rejected the operation
    Registry(RegistryError),
    /// The handler did not build a stream for the descriptor
    StreamCreationFailed { id: StreamId, name: String },
    /// The handler refused to release the stream
    StreamDeletionRejected { id: StreamId, name: String },
    /// The dispatch task panicked before it could be joined
    WorkerPanicked(String),
    /// The dispatch task was cancelled by its runtime before it could be joined
    WorkerCancelled,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Registry(e) => write!(f, "Registry error: {}", e),
            Error::StreamCreationFailed { id, name } => {
                write!(f, "Failed to create stream: {}/{}", name, id)
            }
            Error::StreamDeletionRejected { id, name } => {
                write!(f, "Stream deletion rejected: {}/{}", name, id)
            }
            Error::WorkerPanicked(msg) => write!(f, "Dispatch worker panicked: {}", msg),
            Error::WorkerCancelled => write!(f, "Dispatch worker cancelled"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Registry(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RegistryError> for Error {
    fn from(e: RegistryError) -> Self {
        Error::Registry(e)
    }
}

impl From<JoinError> for Error {
    fn from(e: JoinError) -> Self {
        if e.is_panic() {
            Error::WorkerPanicked(e.to_string())
        } else {
            Error::WorkerCancelled
        }
    }
}

impl Error {
    /// Whether this error reports a stream id that is already registered
    pub fn is_duplicate_stream(&self) -> bool {
        matches!(self, Error::Registry(RegistryError::DuplicateStream(_)))
    }

    /// Whether this error reports a stream that is not registered
    pub fn is_stream_not_found(&self) -> bool {
        matches!(self, Error::Registry(RegistryError::StreamNotFound(_)))
    }
}
