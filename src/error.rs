//! Engine error types

use thiserror::Error;

/// Errors surfaced by the engine's in-process API.
///
/// Validation failures are not errors: a failed validator populates the
/// field's [`ErrorKind`](crate::state::ErrorKind) set and processing of the
/// other fields continues.
#[derive(Debug, Error)]
pub enum FormError {
    /// An input event referenced a field path the form does not contain
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// Configuration file could not be read or written
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Payload or configuration (de)serialization failed
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// The submit sink rejected a delivered payload
    #[error("submit sink failed: {0}")]
    Sink(String),
}
