//! Interface document → two-level operation lookup.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::{CallError, DomainError, DomainResult};
use crate::request::HttpMethod;

use super::{Operation, ParameterLocation, ParameterSpec, Specifier};

/// Tag an operation is filed under when it declares none.
pub const DEFAULT_TAG: &str = "default";

/// Lookup from group tag to operation id to [`Operation`].
///
/// Built once from a document and read-only afterwards. An operation with
/// several tags is shared by reference between their maps.
#[derive(Debug, Clone, Default)]
pub struct OperationIndex {
    tags: HashMap<String, HashMap<String, Arc<Operation>>>,
}

impl OperationIndex {
    /// Parses an interface document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidDocument`] if the text is not JSON or
    /// does not have the expected `paths` structure.
    pub fn from_document(document: &str) -> DomainResult<Self> {
        let value: Value = serde_json::from_str(document)
            .map_err(|e| DomainError::InvalidDocument(e.to_string()))?;
        Self::from_value(&value)
    }

    /// Builds the index from an already parsed document.
    ///
    /// Every `path × method` entry becomes an [`Operation`]. Keys of a path
    /// item that are not HTTP methods (`parameters`, `summary`, `x-*`) are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidDocument`] on structural problems.
    pub fn from_value(document: &Value) -> DomainResult<Self> {
        let paths = document
            .get("paths")
            .and_then(Value::as_object)
            .ok_or_else(|| invalid("document has no 'paths' object"))?;

        let mut index = Self::default();

        for (path, item) in paths {
            let item = item
                .as_object()
                .ok_or_else(|| invalid(format!("path '{path}' is not an object")))?;

            for (key, data) in item {
                let Ok(method) = key.parse::<HttpMethod>() else {
                    continue;
                };
                let data = data
                    .as_object()
                    .ok_or_else(|| invalid(format!("{key} {path} is not an object")))?;

                let operation = parse_operation(path, method, data)?;
                let tags = string_list(data, "tags", path)?;
                index.insert(tags, operation);
            }
        }

        Ok(index)
    }

    fn insert(&mut self, tags: Vec<String>, operation: Operation) {
        let operation = Arc::new(operation);
        let tags = if tags.is_empty() {
            vec![DEFAULT_TAG.to_string()]
        } else {
            tags
        };

        for tag in tags {
            self.tags
                .entry(tag)
                .or_default()
                .insert(operation.id.clone(), Arc::clone(&operation));
        }
    }

    /// Looks up an operation by tag and id.
    ///
    /// # Errors
    ///
    /// Returns [`CallError::NotFound`] if either level is missing.
    pub fn resolve(&self, tag: &str, operation_id: &str) -> Result<&Operation, CallError> {
        self.tags
            .get(tag)
            .and_then(|ops| ops.get(operation_id))
            .map(|op| &**op)
            .ok_or_else(|| CallError::NotFound {
                specifier: format!("{tag}.{operation_id}"),
            })
    }

    /// Looks up an operation by parsed specifier.
    ///
    /// # Errors
    ///
    /// Returns [`CallError::NotFound`] if the operation is unknown.
    pub fn resolve_specifier(&self, specifier: &Specifier) -> Result<&Operation, CallError> {
        self.resolve(&specifier.tag, &specifier.operation_id)
    }

    /// Iterates over the known tags.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }

    /// Iterates over the operations filed under a tag.
    pub fn operations(&self, tag: &str) -> impl Iterator<Item = &Operation> {
        self.tags
            .get(tag)
            .into_iter()
            .flat_map(HashMap::values)
            .map(|op| &**op)
    }

    /// Number of distinct `(tag, operation id)` entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.values().map(HashMap::len).sum()
    }

    /// Returns true if the document declared no operations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

fn invalid(message: impl Into<String>) -> DomainError {
    DomainError::InvalidDocument(message.into())
}

fn parse_operation(path: &str, method: HttpMethod, data: &Map<String, Value>) -> DomainResult<Operation> {
    let id = data
        .get("operationId")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| invalid(format!("{method} {path} has no operationId")))?;

    let mut parameters = IndexMap::new();
    if let Some(list) = data.get("parameters") {
        let list = list
            .as_array()
            .ok_or_else(|| invalid(format!("parameters of '{id}' is not a list")))?;
        for param in list {
            let spec = parse_parameter(id, param)?;
            parameters.insert(spec.name.clone(), spec);
        }
    }

    Ok(Operation {
        id: id.to_string(),
        method,
        path: path.to_string(),
        produces: string_list(data, "produces", path)?,
        parameters,
    })
}

fn parse_parameter(operation_id: &str, param: &Value) -> DomainResult<ParameterSpec> {
    let name = param
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid(format!("parameter of '{operation_id}' has no name")))?;
    let location = param
        .get("in")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid(format!("parameter '{name}' of '{operation_id}' has no 'in'")))?;

    Ok(ParameterSpec {
        name: name.to_string(),
        location: ParameterLocation::parse(location),
        required: param.get("required").and_then(Value::as_bool).unwrap_or(false),
        param_type: param
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    })
}

fn string_list(data: &Map<String, Value>, key: &str, path: &str) -> DomainResult<Vec<String>> {
    match data.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items
            .iter()
            .filter_map(Value::as_str)
            .map(ToString::to_string)
            .collect()),
        Some(_) => Err(invalid(format!("'{key}' under '{path}' is not a list"))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DOCUMENT: &str = r#"{
        "swagger": "2.0",
        "paths": {
            "/health": {
                "get": {
                    "operationId": "HealthCheck",
                    "tags": ["health", "ops"],
                    "produces": ["application/json"]
                }
            },
            "/users/{id}": {
                "parameters": [],
                "get": {
                    "operationId": "GetUser",
                    "parameters": [
                        {"name": "id", "in": "path", "required": true, "type": "integer"},
                        {"name": "fields", "in": "query", "type": "string"},
                        {"name": "session", "in": "cookie"}
                    ]
                },
                "put": {
                    "operationId": "UpdateUser",
                    "tags": ["users"],
                    "parameters": [
                        {"name": "id", "in": "path", "required": true},
                        {"name": "user", "in": "body", "required": true}
                    ]
                }
            }
        }
    }"#;

    #[test]
    fn test_untagged_operation_is_filed_under_default() {
        let index = OperationIndex::from_document(DOCUMENT).unwrap();
        let op = index.resolve("default", "GetUser").unwrap();
        assert_eq!(op.method, HttpMethod::Get);
        assert_eq!(op.path, "/users/{id}");

        assert_eq!(
            index.resolve("users", "GetUser"),
            Err(CallError::NotFound {
                specifier: "users.GetUser".to_string()
            })
        );
    }

    #[test]
    fn test_operation_is_shared_across_tags() {
        let index = OperationIndex::from_document(DOCUMENT).unwrap();
        let a = index.resolve("health", "HealthCheck").unwrap();
        let b = index.resolve("ops", "HealthCheck").unwrap();
        assert_eq!(a, b);
        assert!(std::ptr::eq(a, b));
        assert!(index.resolve("default", "HealthCheck").is_err());
    }

    #[test]
    fn test_parameters_are_captured_in_order() {
        let index = OperationIndex::from_document(DOCUMENT).unwrap();
        let op = index.resolve("default", "GetUser").unwrap();

        let names: Vec<_> = op.parameters.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["id", "fields", "session"]);

        let id = op.parameter("id").unwrap();
        assert_eq!(id.location, ParameterLocation::Path);
        assert!(id.required);
        assert_eq!(id.param_type, "integer");

        let fields = op.parameter("fields").unwrap();
        assert!(!fields.required);
        assert_eq!(op.parameter("session").unwrap().location, ParameterLocation::Cookie);
    }

    #[test]
    fn test_non_method_keys_are_skipped() {
        let index = OperationIndex::from_document(DOCUMENT).unwrap();
        assert_eq!(index.len(), 4);
        let mut tags: Vec<_> = index.tags().collect();
        tags.sort_unstable();
        assert_eq!(tags, vec!["default", "health", "ops", "users"]);
        assert_eq!(index.operations("users").count(), 1);
    }

    #[test]
    fn test_malformed_documents() {
        assert!(matches!(
            OperationIndex::from_document("not json"),
            Err(DomainError::InvalidDocument(_))
        ));
        assert!(matches!(
            OperationIndex::from_document(r#"{"swagger": "2.0"}"#),
            Err(DomainError::InvalidDocument(_))
        ));
        assert!(matches!(
            OperationIndex::from_document(r#"{"paths": {"/a": {"get": {"tags": []}}}}"#),
            Err(DomainError::InvalidDocument(_))
        ));
        assert!(matches!(
            OperationIndex::from_document(
                r#"{"paths": {"/a": {"get": {"operationId": "A", "parameters": {}}}}}"#
            ),
            Err(DomainError::InvalidDocument(_))
        ));
    }

    #[test]
    fn test_empty_paths() {
        let index = OperationIndex::from_document(r#"{"paths": {}}"#).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
    }
}
