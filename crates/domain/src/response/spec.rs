//! Response envelope type
//!
//! Holds what one executed call produced: status, headers, cookies, body,
//! timing, and the error that stopped the call, if any.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CallError;

/// A cookie received in a `Set-Cookie` header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: String,
    /// Domain attribute, if sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Path attribute, if sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// HttpOnly flag.
    #[serde(default)]
    pub http_only: bool,
    /// Secure flag.
    #[serde(default)]
    pub secure: bool,
}

impl Cookie {
    /// Create a new cookie without attributes.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: None,
            path: None,
            http_only: false,
            secure: false,
        }
    }
}

/// Whether the call behind an envelope completed.
///
/// A response is created in one of the two states and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "error", rename_all = "snake_case")]
pub enum ResponseState {
    /// The call completed; fields hold the received data.
    #[default]
    Clean,
    /// The call failed before a usable response existed.
    Errored(CallError),
}

/// The envelope returned from one executed call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Response {
    /// Response body as text.
    pub body: String,
    /// Status text (e.g. "OK", "Not Found").
    pub status: String,
    /// Numeric status code.
    pub status_code: u16,
    /// First value of every response header, keyed by canonical name.
    pub headers: HashMap<String, String>,
    /// Cookies set by the response.
    pub cookies: Vec<Cookie>,
    /// Wall-clock duration of the call.
    #[serde(with = "duration_millis")]
    pub elapsed: Duration,
    /// Final request URL.
    pub request_url: String,
    state: ResponseState,
}

impl Response {
    /// Creates the envelope of a call that failed. All data fields are empty.
    #[must_use]
    pub fn errored(error: CallError) -> Self {
        Self {
            state: ResponseState::Errored(error),
            ..Self::default()
        }
    }

    /// Creates the envelope of a completed call.
    ///
    /// Header names are canonicalised and only the first value seen for a
    /// name is kept.
    #[must_use]
    pub fn completed(
        status_code: u16,
        status: impl Into<String>,
        headers: impl IntoIterator<Item = (String, String)>,
        cookies: Vec<Cookie>,
        body: String,
        elapsed: Duration,
        request_url: impl Into<String>,
    ) -> Self {
        let mut first_values = HashMap::new();
        for (name, value) in headers {
            first_values
                .entry(canonical_header_name(&name))
                .or_insert(value);
        }

        Self {
            body,
            status: status.into(),
            status_code,
            headers: first_values,
            cookies,
            elapsed,
            request_url: request_url.into(),
            state: ResponseState::Clean,
        }
    }

    /// Returns the state of the envelope.
    #[must_use]
    pub const fn state(&self) -> &ResponseState {
        &self.state
    }

    /// Returns the error that stopped the call, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&CallError> {
        match &self.state {
            ResponseState::Clean => None,
            ResponseState::Errored(err) => Some(err),
        }
    }

    /// Returns true once the call has failed.
    #[must_use]
    pub const fn is_errored(&self) -> bool {
        matches!(self.state, ResponseState::Errored(_))
    }

    /// Case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&canonical_header_name(name))
            .map(String::as_str)
    }

    /// Elapsed duration rendered for display, e.g. `12.5ms`.
    #[must_use]
    pub fn request_time(&self) -> String {
        format!("{:?}", self.elapsed)
    }
}

/// Canonical MIME header form: `content-type` → `Content-Type`.
#[must_use]
pub fn canonical_header_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
            })
        })
        .collect::<Vec<_>>()
        .join("-")
}

mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        #[allow(clippy::cast_possible_truncation)]
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
