//! HTTP transport port

use std::time::Duration;

use apiprobe_domain::{Cookie, HttpMethod};
use thiserror::Error;

/// A fully built request ready to hand to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute URL including the query string.
    pub url: String,
    /// Headers in the order they are sent.
    pub headers: Vec<(String, String)>,
    /// Request body, if any.
    pub body: Option<Vec<u8>>,
    /// Bound on the whole call. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Whether redirects are followed or returned as-is.
    pub follow_redirects: bool,
}

impl OutgoingRequest {
    /// Creates a request with no headers, body or timeout.
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
            timeout: None,
            follow_redirects: false,
        }
    }

    /// Appends a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the redirect policy.
    #[must_use]
    pub const fn with_follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }
}

/// What the transport received, before body decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResponse {
    /// Numeric status code.
    pub status_code: u16,
    /// Status text, e.g. "Not Found".
    pub status_text: String,
    /// Every header line received, duplicates included, in wire order.
    pub headers: Vec<(String, String)>,
    /// Cookies set by the response.
    pub cookies: Vec<Cookie>,
    /// Undecoded body bytes.
    pub body: Vec<u8>,
    /// Final URL after any followed redirects.
    pub url: String,
}

/// Errors raised by a transport.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The call exceeded its timeout.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Timeout that was exceeded.
        timeout_ms: u64,
    },

    /// The server refused the connection.
    #[error("connection refused: {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// Any other connection failure.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The redirect limit was exceeded.
    #[error("too many redirects (max {max})")]
    TooManyRedirects {
        /// Redirect limit.
        max: usize,
    },

    /// The response arrived but its body could not be read.
    #[error("failed to read body: {0}")]
    BodyRead(String),

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Returns true if the round-trip succeeded and only the body failed.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(self, Self::BodyRead(_))
    }
}

/// Port for issuing HTTP requests.
///
/// Implementations are blocking and must be shareable across threads so a
/// single client can serve concurrently running tests.
pub trait HttpTransport: Send + Sync {
    /// Sends one request and returns what came back.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if no response could be obtained or its
    /// body could not be read.
    fn send(&self, request: &OutgoingRequest) -> Result<RawResponse, TransportError>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for std::sync::Arc<T> {
    fn send(&self, request: &OutgoingRequest) -> Result<RawResponse, TransportError> {
        (**self).send(request)
    }
}
