//! Builds an [`ApiClient`] from an interface document on disk.

use std::path::{Path, PathBuf};

use apiprobe_application::{ApiClient, ApplicationResult, ClientConfig, HttpTransport};
use apiprobe_domain::OperationIndex;

use crate::adapters::ReqwestTransport;
use crate::config::EnvConfigLoader;

/// Builder for a client over one interface document.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    document: PathBuf,
    config: ClientConfig,
}

impl ClientBuilder {
    /// Starts a builder for the document at `path` with default config.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            document: path.into(),
            config: ClientConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Applies environment overrides to the current configuration.
    #[must_use]
    pub fn with_env(mut self) -> Self {
        self.config = EnvConfigLoader::from_process_env().apply(self.config);
        self
    }

    /// The document path.
    pub fn document(&self) -> &Path {
        &self.document
    }

    /// Builds a client over the reqwest transport.
    ///
    /// # Errors
    ///
    /// Fails if the document cannot be read or parsed, or the transport
    /// cannot be created.
    pub fn build(self) -> ApplicationResult<ApiClient<ReqwestTransport>> {
        let transport = ReqwestTransport::new()?;
        self.build_with(transport)
    }

    /// Builds a client over a caller-supplied transport.
    ///
    /// # Errors
    ///
    /// Fails if the document cannot be read or parsed.
    pub fn build_with<T: HttpTransport>(self, transport: T) -> ApplicationResult<ApiClient<T>> {
        let text = std::fs::read_to_string(&self.document)?;
        let index = OperationIndex::from_document(&text)?;
        tracing::debug!(
            document = %self.document.display(),
            operations = index.len(),
            "loaded interface document"
        );
        Ok(ApiClient::new(self.config, index, transport))
    }
}

/// Builds a client for the document at `path`, configured from the
/// environment.
///
/// # Errors
///
/// See [`ClientBuilder::build`].
pub fn build_client(path: impl AsRef<Path>) -> ApplicationResult<ApiClient<ReqwestTransport>> {
    ClientBuilder::new(path.as_ref()).with_env().build()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use apiprobe_application::{ApplicationError, OutgoingRequest, RawResponse, TransportError};
    use std::io::Write;

    struct NoopTransport;

    impl HttpTransport for NoopTransport {
        fn send(&self, _request: &OutgoingRequest) -> Result<RawResponse, TransportError> {
            Ok(RawResponse::default())
        }
    }

    #[test]
    fn test_build_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"paths": {{"/health": {{"get": {{"operationId": "HealthCheck", "tags": ["health"]}}}}}}}}"#
        )
        .unwrap();

        let client = ClientBuilder::new(file.path())
            .with_config(ClientConfig::default().with_port(9999))
            .build_with(NoopTransport)
            .unwrap();

        assert_eq!(client.index().len(), 1);
        assert_eq!(client.config().port, 9999);
        assert!(client.index().resolve("health", "HealthCheck").is_ok());
    }

    #[test]
    fn test_missing_file() {
        let err = ClientBuilder::new("/nonexistent/apiprobe/document.json")
            .build_with(NoopTransport)
            .err()
            .unwrap();
        assert!(matches!(err, ApplicationError::Io(_)));
    }

    #[test]
    fn test_malformed_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"paths\": 5}}").unwrap();
        let err = ClientBuilder::new(file.path())
            .build_with(NoopTransport)
            .err()
            .unwrap();
        assert!(matches!(err, ApplicationError::Domain(_)));
    }
}
