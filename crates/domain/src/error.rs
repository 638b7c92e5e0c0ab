//! Domain error types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Domain-level errors raised while interpreting an interface document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The interface description document is malformed.
    #[error("invalid interface document: {0}")]
    InvalidDocument(String),

    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// A count comparison operator is not one of `=, !=, >, >=, <, <=`.
    #[error("invalid comparison operator: {0}")]
    InvalidComparison(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// The category of a [`CallError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The specifier had more than two `.`-separated segments.
    InvalidSpecifier,
    /// Unknown tag or operation id.
    NotFound,
    /// A required parameter was not supplied.
    MissingRequiredParameter,
    /// A supplied parameter has no specification on the operation.
    ExtraneousParameter,
    /// The body parameter could not be serialized.
    BodySerialization,
    /// Network, timeout or request construction failure.
    Transport,
    /// The body could not be read after a successful round-trip.
    Decode,
}

/// An error attached to a response envelope.
///
/// Errors compare structurally, so an expected error can be built by the
/// caller and checked with `expect_error`.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CallError {
    /// The specifier is neither `operationId` nor `tag.operationId`.
    #[error("invalid path specifier '{specifier}'")]
    InvalidSpecifier {
        /// The rejected specifier.
        specifier: String,
    },

    /// No operation is registered under the specifier.
    #[error("route {specifier} not found")]
    NotFound {
        /// The specifier that failed to resolve.
        specifier: String,
    },

    /// A parameter marked required was absent.
    #[error("required parameter '{name}' not provided")]
    MissingRequiredParameter {
        /// Parameter name.
        name: String,
    },

    /// A parameter was supplied that the operation does not declare.
    #[error("[extraneous parameter] '{tag}.{operation_id}' has no parameter specification '{name}'")]
    ExtraneousParameter {
        /// Tag the operation was resolved under.
        tag: String,
        /// Operation id.
        operation_id: String,
        /// Parameter name with any disambiguation suffix removed.
        name: String,
    },

    /// The body value could not be serialized to JSON.
    #[error("marshal of request body failed with message: {message}")]
    BodySerialization {
        /// Serializer error message.
        message: String,
    },

    /// The request never produced a response.
    #[error("request to URL {url} failed with error: {message}")]
    Transport {
        /// Target URL.
        url: String,
        /// Transport error message.
        message: String,
    },

    /// The response body could not be read.
    #[error("unable to unpack body from request to URL {url}: {message}")]
    Decode {
        /// Target URL.
        url: String,
        /// Read or decompression error message.
        message: String,
    },
}

impl CallError {
    /// Returns the category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSpecifier { .. } => ErrorKind::InvalidSpecifier,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::MissingRequiredParameter { .. } => ErrorKind::MissingRequiredParameter,
            Self::ExtraneousParameter { .. } => ErrorKind::ExtraneousParameter,
            Self::BodySerialization { .. } => ErrorKind::BodySerialization,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Decode { .. } => ErrorKind::Decode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_call_error_kind() {
        let err = CallError::MissingRequiredParameter {
            name: "id".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::MissingRequiredParameter);
        assert_eq!(err.to_string(), "required parameter 'id' not provided");
    }

    #[test]
    fn test_call_errors_compare_structurally() {
        let a = CallError::NotFound {
            specifier: "users.Get".to_string(),
        };
        let b = CallError::NotFound {
            specifier: "users.Get".to_string(),
        };
        assert_eq!(a, b);
        assert_ne!(
            a,
            CallError::NotFound {
                specifier: "users.List".to_string()
            }
        );
    }

    #[test]
    fn test_transport_message_contains_url() {
        let err = CallError::Transport {
            url: "http://localhost:4080/health".to_string(),
            message: "connection refused".to_string(),
        };
        assert!(err.to_string().contains("http://localhost:4080/health"));
    }
}
