//! The invocation entry point
//!
//! [`ApiClient`] resolves a specifier against the operation index, binds the
//! supplied parameters and executes the call.

use std::sync::atomic::{AtomicBool, Ordering};

use apiprobe_domain::{
    CallError, JsonResponse, OperationIndex, Params, Response, Specifier,
};

use crate::binder::bind;
use crate::config::ClientConfig;
use crate::executor::execute_request;
use crate::ports::{HttpTransport, OutgoingRequest};

/// Value of the identity header stamped on every call.
pub const IDENTITY_HEADER_VALUE: &str = "true";

/// Executes operations of one interface document against one service.
///
/// The index and config are read-only after construction; only the redirect
/// policy may change between calls. A client can be shared by reference
/// across threads.
pub struct ApiClient<T: HttpTransport> {
    config: ClientConfig,
    index: OperationIndex,
    transport: T,
    follow_redirects: AtomicBool,
}

impl<T: HttpTransport> ApiClient<T> {
    /// Creates a client. The initial redirect policy comes from `config`.
    pub fn new(config: ClientConfig, index: OperationIndex, transport: T) -> Self {
        let follow_redirects = AtomicBool::new(config.follow_redirects);
        Self {
            config,
            index,
            transport,
            follow_redirects,
        }
    }

    /// The configuration the client was built with.
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The operation index.
    pub const fn index(&self) -> &OperationIndex {
        &self.index
    }

    /// The underlying transport.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Whether the next call follows redirects.
    pub fn follow_redirects(&self) -> bool {
        self.follow_redirects.load(Ordering::Relaxed)
    }

    /// Changes the redirect policy for subsequent calls.
    pub fn set_follow_redirects(&self, follow: bool) {
        self.follow_redirects.store(follow, Ordering::Relaxed);
    }

    /// Resolves, binds and executes `specifier` (`tag.operationId` or
    /// `operationId`).
    ///
    /// Resolution and binding failures are returned on the envelope without
    /// any network call.
    pub fn execute(&self, specifier: &str, params: &Params) -> Response {
        match self.prepare(specifier, params) {
            Ok(request) => self.send(&request),
            Err(err) => {
                tracing::debug!(specifier, error = %err, "call not sent");
                Response::errored(err)
            }
        }
    }

    /// Like [`ApiClient::execute`], also parsing the body as JSON.
    pub fn execute_json(&self, specifier: &str, params: &Params) -> JsonResponse {
        JsonResponse::new(self.execute(specifier, params))
    }

    /// Sends an already built request.
    pub fn send(&self, request: &OutgoingRequest) -> Response {
        execute_request(&self.transport, request)
    }

    /// Builds the request `execute` would send.
    ///
    /// # Errors
    ///
    /// Returns the resolution or binding error.
    pub fn prepare(&self, specifier: &str, params: &Params) -> Result<OutgoingRequest, CallError> {
        let specifier = Specifier::parse(specifier)?;
        let operation = self.index.resolve_specifier(&specifier)?;
        tracing::debug!(
            specifier = %specifier,
            method = %operation.method,
            path = %operation.path,
            "resolved operation"
        );

        let bound = bind(&specifier.tag, operation, params)?;
        let url = bound.url(&self.config);

        let mut headers = Vec::with_capacity(bound.headers.len() + 2);
        set_header(&mut headers, "Content-Type", bound.content_type);
        for (name, value) in bound.headers {
            set_header(&mut headers, &name, value);
        }
        set_header(
            &mut headers,
            &self.config.identity_header,
            IDENTITY_HEADER_VALUE.to_string(),
        );

        Ok(OutgoingRequest {
            method: bound.method,
            url,
            headers,
            body: bound.body,
            timeout: self.config.timeout(),
            follow_redirects: self.follow_redirects(),
        })
    }
}

/// Sets a header, replacing any earlier value under the same name.
fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: String) {
    if let Some(existing) = headers
        .iter_mut()
        .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
    {
        existing.1 = value;
    } else {
        headers.push((name.to_string(), value));
    }
}
