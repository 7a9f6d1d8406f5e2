//! Registry error types

use crate::stream::StreamId;

/// Error type for registry operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A stream with this id is already registered
    DuplicateStream(StreamId),
    /// Stream not found
    StreamNotFound(StreamId),
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::DuplicateStream(id) => write!(f, "Stream already registered: {}", id),
            RegistryError::StreamNotFound(id) => write!(f, "Stream not found: {}", id),
        }
    }
}

impl std::error::Error for RegistryError {}
