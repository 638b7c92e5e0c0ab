//! Application error types

use thiserror::Error;
use apiprobe_domain::DomainError;

use crate::ports::TransportError;

/// Application-level errors.
///
/// Failures of an individual call never surface here; they are attached to
/// the returned envelope. These errors stop a client from being built.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// The interface document could not be interpreted.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// The interface document could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The transport could not be constructed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
