//! Client configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default URL scheme.
pub const DEFAULT_SCHEME: &str = "http";
/// Default target host.
pub const DEFAULT_HOST: &str = "localhost";
/// Default target port.
pub const DEFAULT_PORT: u16 = 4080;
/// Default name of the header that marks integration-test traffic.
pub const DEFAULT_IDENTITY_HEADER: &str = "X-Integration-Tests";

/// Where and how calls are sent.
///
/// Populated once at startup, usually by an environment loader in the
/// infrastructure layer. The engine never reads the environment itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// URL scheme, `http` or `https`.
    pub scheme: String,
    /// Target host.
    pub host: String,
    /// Target port.
    pub port: u16,
    /// Header stamped on every call with the value `"true"`.
    pub identity_header: String,
    /// Bound on each call in milliseconds. Zero disables the bound.
    pub timeout_ms: u64,
    /// Initial redirect policy of a client built from this config.
    pub follow_redirects: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            scheme: DEFAULT_SCHEME.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            identity_header: DEFAULT_IDENTITY_HEADER.to_string(),
            timeout_ms: 0,
            follow_redirects: false,
        }
    }
}

impl ClientConfig {
    /// Sets the scheme.
    #[must_use]
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Sets the host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the identity header name.
    #[must_use]
    pub fn with_identity_header(mut self, name: impl Into<String>) -> Self {
        self.identity_header = name.into();
        self
    }

    /// Sets the timeout in milliseconds.
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Sets the initial redirect policy.
    #[must_use]
    pub const fn with_follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    /// `scheme://host:port`, with no trailing slash.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }

    /// The per-call timeout, if one is configured.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        if self.timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.timeout_ms))
        }
    }
}
