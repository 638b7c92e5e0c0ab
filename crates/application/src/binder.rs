//! Parameter binder
//!
//! Routes caller-supplied values into the path, query string, headers or
//! body of an operation's request, rejecting missing and unknown names.

use apiprobe_domain::{
    CallError, HttpMethod, Operation, ParameterLocation, Params, strip_disambiguation,
};
use indexmap::IndexMap;
use url::form_urlencoded;

use crate::config::ClientConfig;

/// An operation with every supplied value routed to its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Path with placeholders substituted.
    pub path: String,
    /// `name=value` fragments, escaped, in supply order.
    pub query: Vec<String>,
    /// Header values; a later value for the same name replaces an earlier one.
    pub headers: IndexMap<String, String>,
    /// Request body.
    pub body: Option<Vec<u8>>,
    /// Content type taken from the operation's produced media types.
    pub content_type: String,
}

impl BoundRequest {
    /// Joins the base URL, the path and the query fragments.
    ///
    /// The first fragment is introduced with `?` unless the path already
    /// carries a query string.
    #[must_use]
    pub fn url(&self, config: &ClientConfig) -> String {
        let mut url = format!(
            "{}/{}",
            config.base_url(),
            self.path.trim_start_matches('/')
        );
        if !self.query.is_empty() {
            url.push(if self.path.contains('?') { '&' } else { '?' });
            url.push_str(&self.query.join("&"));
        }
        url
    }
}

/// Binds `params` to `operation`.
///
/// `tag` is only used to describe an extraneous parameter.
///
/// # Errors
///
/// - [`CallError::MissingRequiredParameter`] for the first required
///   parameter, in document order, not supplied under its exact name. A
///   suffixed name such as `org{1}` does not count.
/// - [`CallError::ExtraneousParameter`] for a supplied name the operation
///   does not declare.
/// - [`CallError::BodySerialization`] if the body value cannot be encoded.
pub fn bind(tag: &str, operation: &Operation, params: &Params) -> Result<BoundRequest, CallError> {
    if let Some(missing) = operation
        .required_parameters()
        .find(|spec| params.get(&spec.name).is_none())
    {
        return Err(CallError::MissingRequiredParameter {
            name: missing.name.clone(),
        });
    }

    let mut bound = BoundRequest {
        method: operation.method,
        path: operation.path.clone(),
        query: Vec::new(),
        headers: IndexMap::new(),
        body: None,
        content_type: operation.produces_content_type().to_string(),
    };

    for (supplied_name, value) in params.iter() {
        let name = strip_disambiguation(supplied_name);
        let Some(spec) = operation.parameter(&name) else {
            return Err(CallError::ExtraneousParameter {
                tag: tag.to_string(),
                operation_id: operation.id.clone(),
                name,
            });
        };

        match &spec.location {
            ParameterLocation::Path => {
                let placeholder = format!("{{{name}}}");
                let escaped = urlencoding::encode(&value.to_param_string()).into_owned();
                bound.path = bound.path.replace(&placeholder, &escaped);
            }
            ParameterLocation::Query => {
                let escaped: String =
                    form_urlencoded::byte_serialize(value.to_param_string().as_bytes()).collect();
                bound.query.push(format!("{name}={escaped}"));
            }
            ParameterLocation::Header => {
                bound.headers.insert(name, value.to_param_string());
            }
            ParameterLocation::Body => {
                bound.body = Some(value.to_body()?);
            }
            ParameterLocation::Cookie | ParameterLocation::Other(_) => {
                tracing::warn!(
                    parameter = %name,
                    location = spec.location.as_str(),
                    operation = %operation.id,
                    "parameter location is not applied to the request; value ignored"
                );
            }
        }
    }

    Ok(bound)
}
