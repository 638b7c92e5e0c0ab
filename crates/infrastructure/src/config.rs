//! Environment-driven client configuration.

use apiprobe_application::ClientConfig;

/// Overrides the URL scheme.
pub const ENV_SCHEME: &str = "SCHEME";
/// Overrides the target host.
pub const ENV_HOST: &str = "HOST";
/// Overrides the target port.
pub const ENV_PORT: &str = "PORT";
/// Overrides the identity header name.
pub const ENV_IDENTITY: &str = "IDENTITY";
/// Overrides the per-call timeout in milliseconds.
pub const ENV_TIMEOUT: &str = "TIMEOUT";

/// Builds a [`ClientConfig`] from environment variables.
///
/// Variables are read through a lookup function so tests can supply their
/// own. Empty values count as unset. Malformed numbers are logged and the
/// default is kept.
pub struct EnvConfigLoader<F> {
    lookup: F,
}

impl EnvConfigLoader<fn(&str) -> Option<String>> {
    /// Reads the process environment.
    #[must_use]
    pub fn from_process_env() -> Self {
        Self::new(process_env)
    }
}

impl<F> EnvConfigLoader<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Creates a loader over `lookup`.
    pub const fn new(lookup: F) -> Self {
        Self { lookup }
    }

    /// Defaults with every set variable applied.
    pub fn load(&self) -> ClientConfig {
        self.apply(ClientConfig::default())
    }

    /// Applies every set variable to `config`.
    pub fn apply(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(scheme) = self.var(ENV_SCHEME) {
            config.scheme = scheme;
        }
        if let Some(host) = self.var(ENV_HOST) {
            config.host = host;
        }
        if let Some(port) = self.number(ENV_PORT) {
            config.port = port;
        }
        if let Some(identity) = self.var(ENV_IDENTITY) {
            config.identity_header = identity;
        }
        if let Some(timeout_ms) = self.number(ENV_TIMEOUT) {
            config.timeout_ms = timeout_ms;
        }
        config
    }

    fn var(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn number<N: std::str::FromStr>(&self, name: &str) -> Option<N>
    where
        N::Err: std::fmt::Display,
    {
        let raw = self.var(name)?;
        match raw.parse() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(variable = name, value = %raw, error = %e, "ignoring malformed override");
                None
            }
        }
    }
}

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}
