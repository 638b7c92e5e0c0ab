//! HTTP transport implementation using reqwest.
//!
//! This adapter implements the `HttpTransport` port with reqwest's blocking
//! client. Bodies are read as-is; decompression is left to the executor.

use std::error::Error as _;
use std::time::Duration;

use apiprobe_application::ports::{HttpTransport, OutgoingRequest, RawResponse, TransportError};
use apiprobe_domain::{Cookie, HttpMethod};
use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use reqwest::{Method, Url};

/// Redirects followed before giving up.
pub const MAX_REDIRECTS: usize = 10;

/// Blocking reqwest transport.
///
/// Holds one client that follows redirects and one that does not, and picks
/// between them per request. Both share no state beyond reqwest's own
/// connection pools.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    following: Client,
    stopping: Client,
}

impl ReqwestTransport {
    /// Creates a transport with default settings.
    ///
    /// Default configuration:
    /// - No timeout unless a request sets one
    /// - Up to 10 redirects when following
    /// - No cookie store and no automatic decompression
    /// - User-Agent: "apiprobe/<version>"
    ///
    /// # Errors
    ///
    /// Returns an error if a client cannot be created.
    pub fn new() -> Result<Self, TransportError> {
        Ok(Self {
            following: Self::build(Policy::limited(MAX_REDIRECTS))?,
            stopping: Self::build(Policy::none())?,
        })
    }

    fn build(policy: Policy) -> Result<Client, TransportError> {
        Client::builder()
            .user_agent(concat!("apiprobe/", env!("CARGO_PKG_VERSION")))
            .redirect(policy)
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| TransportError::Other(error_chain(&e)))
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Head => Method::HEAD,
            HttpMethod::Options => Method::OPTIONS,
            HttpMethod::Trace => Method::TRACE,
        }
    }

    /// Maps reqwest errors to `TransportError`.
    fn map_error(error: &reqwest::Error, timeout: Option<Duration>) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout {
                timeout_ms: timeout.map_or(0, |t| u64::try_from(t.as_millis()).unwrap_or(u64::MAX)),
            };
        }

        let message = error_chain(error);

        if error.is_connect() {
            if message.to_lowercase().contains("refused") {
                return TransportError::ConnectionRefused {
                    host: error
                        .url()
                        .and_then(|u| u.host_str().map(str::to_string))
                        .unwrap_or_else(|| "unknown".to_string()),
                    port: error
                        .url()
                        .and_then(Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            return TransportError::ConnectionFailed(message);
        }

        if error.is_redirect() {
            return TransportError::TooManyRedirects { max: MAX_REDIRECTS };
        }

        if error.is_body() || error.is_decode() {
            return TransportError::BodyRead(message);
        }

        TransportError::Other(message)
    }

    fn to_cookie(cookie: &reqwest::cookie::Cookie<'_>) -> Cookie {
        Cookie {
            name: cookie.name().to_string(),
            value: cookie.value().to_string(),
            domain: cookie.domain().map(str::to_string),
            path: cookie.path().map(str::to_string),
            http_only: cookie.http_only(),
            secure: cookie.secure(),
        }
    }
}

impl HttpTransport for ReqwestTransport {
    fn send(&self, request: &OutgoingRequest) -> Result<RawResponse, TransportError> {
        let url = Url::parse(&request.url)
            .map_err(|e| TransportError::InvalidUrl(format!("{e}: {}", request.url)))?;

        let client = if request.follow_redirects {
            &self.following
        } else {
            &self.stopping
        };

        let mut builder = client.request(Self::to_reqwest_method(request.method), url);
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder
            .send()
            .map_err(|e| Self::map_error(&e, request.timeout))?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let cookies = response.cookies().map(|c| Self::to_cookie(&c)).collect();
        let final_url = response.url().to_string();

        // The connection is released once the body has been read or dropped.
        let body = response
            .bytes()
            .map_err(|e| TransportError::BodyRead(error_chain(&e)))?
            .to_vec();

        Ok(RawResponse {
            status_code: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            cookies,
            body,
            url: final_url,
        })
    }
}

/// An error message followed by each of its sources.
fn error_chain(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
