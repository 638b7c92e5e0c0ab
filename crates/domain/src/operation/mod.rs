//! Addressable operations from an interface description document.
//!
//! An [`Operation`] is one method + path combination. The
//! [`OperationIndex`] files every operation under each of its tags so a
//! short specifier such as `users.GetUser` resolves to it.

mod index;
mod specifier;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::request::HttpMethod;

pub use index::{DEFAULT_TAG, OperationIndex};
pub use specifier::Specifier;

/// Content type sent when an operation declares no produced media types.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Where a parameter value goes in the outgoing request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    /// Substituted into the `{name}` placeholder of the path template.
    Path,
    /// Appended to the query string.
    Query,
    /// Sent as a request header.
    Header,
    /// Sent as the request body.
    Body,
    /// Declared by the document but not applied to the request yet.
    Cookie,
    /// Any other location (e.g. `formData`); accepted without effect.
    #[serde(untagged)]
    Other(String),
}

impl ParameterLocation {
    /// Parses the `in` field of a parameter declaration.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "path" => Self::Path,
            "query" => Self::Query,
            "header" => Self::Header,
            "body" => Self::Body,
            "cookie" => Self::Cookie,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the location as written in the document.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Header => "header",
            Self::Body => "body",
            Self::Cookie => "cookie",
            Self::Other(other) => other,
        }
    }
}

/// Declaration of a single operation parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Parameter name, unique within the operation.
    pub name: String,
    /// Request position.
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    /// Whether the caller must supply the parameter.
    #[serde(default)]
    pub required: bool,
    /// Declared type. Advisory only.
    #[serde(rename = "type", default)]
    pub param_type: String,
}

/// One method + path combination from the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// `operationId` from the document.
    pub id: String,
    /// HTTP method.
    pub method: HttpMethod,
    /// Path template with `{name}` placeholders.
    pub path: String,
    /// Declared response media types.
    #[serde(default)]
    pub produces: Vec<String>,
    /// Parameter specifications keyed by name, in document order.
    #[serde(default)]
    pub parameters: IndexMap<String, ParameterSpec>,
}

impl Operation {
    /// Returns the parameter specification with the given name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.get(name)
    }

    /// Iterates over required parameters in document order.
    pub fn required_parameters(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.parameters.values().filter(|p| p.required)
    }

    /// Content type for the outgoing request: the first produced media
    /// type, or `application/json`.
    #[must_use]
    pub fn produces_content_type(&self) -> &str {
        self.produces
            .first()
            .map_or(DEFAULT_CONTENT_TYPE, String::as_str)
    }
}
