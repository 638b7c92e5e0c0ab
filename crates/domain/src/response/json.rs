//! Path-addressed reader over a JSON response body.

use std::fmt;

use serde_json::Value;

use crate::request::json_to_param_string;

/// JSON type of the value found at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonType {
    /// A string.
    String,
    /// A number with no fractional part that fits an `i64`/`u64`.
    Int,
    /// Any other number.
    Float,
    /// `true` or `false`.
    Bool,
    /// `null`.
    Null,
    /// An array.
    Array,
    /// An object.
    Object,
    /// Nothing exists at the path.
    Undefined,
}

impl JsonType {
    /// Type of a JSON value.
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::String(_) => Self::String,
            Value::Number(n) if n.is_f64() => Self::Float,
            Value::Number(_) => Self::Int,
            Value::Bool(_) => Self::Bool,
            Value::Null => Self::Null,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    /// Name used in type expectations.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Null => "null",
            Self::Array => "array",
            Self::Object => "object",
            Self::Undefined => "undefined",
        }
    }

    /// Whether an expected type name accepts this type. `"number"` accepts
    /// both `int` and `float`.
    #[must_use]
    pub fn satisfies(self, expected: &str) -> bool {
        expected == self.as_str() || (expected == "number" && matches!(self, Self::Int | Self::Float))
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reads values out of a JSON document by dotted/bracketed path.
///
/// Supported paths: `name`, `data.items[0].id`, `data.items.0.id`, with an
/// optional leading `$` or `$.`. An empty path addresses the root. A body
/// that is not JSON produces a reader in which no path exists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonReader {
    root: Option<Value>,
}

impl JsonReader {
    /// Parses a body. Invalid JSON yields an empty reader.
    #[must_use]
    pub fn parse(body: &str) -> Self {
        Self {
            root: serde_json::from_str(body).ok(),
        }
    }

    /// Wraps an already parsed value.
    #[must_use]
    pub const fn from_value(value: Value) -> Self {
        Self { root: Some(value) }
    }

    /// Returns true if the body parsed as JSON.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.root.is_some()
    }

    /// Returns the value at a path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = self.root.as_ref()?;
        for segment in split_path_segments(path) {
            current = match segment {
                Segment::Key(key) => match current {
                    Value::Object(map) => map.get(&key)?,
                    Value::Array(items) => items.get(key.parse::<usize>().ok()?)?,
                    _ => return None,
                },
                Segment::Index(idx) => current.as_array()?.get(idx)?,
            };
        }
        Some(current)
    }

    /// Returns true if a value (including `null`) exists at the path.
    #[must_use]
    pub fn key_exists(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// JSON type at the path; [`JsonType::Undefined`] if missing.
    #[must_use]
    pub fn type_of(&self, path: &str) -> JsonType {
        self.get(path).map_or(JsonType::Undefined, JsonType::of)
    }

    /// String-coerced value at the path; empty if missing.
    #[must_use]
    pub fn get_string(&self, path: &str) -> String {
        self.get(path).map(json_to_param_string).unwrap_or_default()
    }

    /// Number of children at the path: array length, object key count,
    /// zero for scalars and missing paths.
    #[must_use]
    pub fn child_count(&self, path: &str) -> usize {
        match self.get(path) {
            Some(Value::Array(items)) => items.len(),
            Some(Value::Object(map)) => map.len(),
            _ => 0,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

/// Split a path into segments, respecting array brackets.
fn split_path_segments(path: &str) -> Vec<Segment> {
    let path = path.trim();
    let path = path.strip_prefix('$').unwrap_or(path);

    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_bracket = false;

    for ch in path.chars() {
        match ch {
            '.' if !in_bracket => {
                if !current.is_empty() {
                    segments.push(Segment::Key(std::mem::take(&mut current)));
                }
            }
            '[' if !in_bracket => {
                if !current.is_empty() {
                    segments.push(Segment::Key(std::mem::take(&mut current)));
                }
                in_bracket = true;
            }
            ']' if in_bracket => {
                let inner = std::mem::take(&mut current);
                segments.push(parse_bracket(&inner));
                in_bracket = false;
            }
            _ => current.push(ch),
        }
    }

    if !current.is_empty() {
        segments.push(Segment::Key(current));
    }

    segments
}

/// `[0]` is an index, `["name"]` / `['name']` / `[name]` a key.
fn parse_bracket(inner: &str) -> Segment {
    if let Ok(idx) = inner.trim().parse::<usize>() {
        return Segment::Index(idx);
    }
    let unquoted = inner
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .to_string();
    Segment::Key(unquoted)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn reader() -> JsonReader {
        JsonReader::parse(
            r#"{
                "name": "X",
                "version": "1.2.3",
                "count": 10,
                "ratio": 0.5,
                "active": true,
                "missing": null,
                "data": {"items": [{"id": 1}, {"id": 2}, {"id": 3}]},
                "a.b": "dotted"
            }"#,
        )
    }

    #[test]
    fn test_split_path_segments() {
        assert_eq!(
            split_path_segments("$.data.items[1].id"),
            vec![
                Segment::Key("data".to_string()),
                Segment::Key("items".to_string()),
                Segment::Index(1),
                Segment::Key("id".to_string()),
            ]
        );
        assert_eq!(split_path_segments(""), vec![]);
        assert_eq!(
            split_path_segments(r#"["a.b"]"#),
            vec![Segment::Key("a.b".to_string())]
        );
    }

    #[test]
    fn test_get_paths() {
        let r = reader();
        assert_eq!(r.get("name"), Some(&json!("X")));
        assert_eq!(r.get("data.items[1].id"), Some(&json!(2)));
        assert_eq!(r.get("data.items.2.id"), Some(&json!(3)));
        assert_eq!(r.get("$.count"), Some(&json!(10)));
        assert_eq!(r.get(r#"["a.b"]"#), Some(&json!("dotted")));
        assert_eq!(r.get("data.items[9]"), None);
        assert_eq!(r.get("name.first"), None);
        assert!(r.get("").unwrap().is_object());
    }

    #[test]
    fn test_types() {
        let r = reader();
        assert_eq!(r.type_of("name"), JsonType::String);
        assert_eq!(r.type_of("count"), JsonType::Int);
        assert_eq!(r.type_of("ratio"), JsonType::Float);
        assert_eq!(r.type_of("active"), JsonType::Bool);
        assert_eq!(r.type_of("missing"), JsonType::Null);
        assert_eq!(r.type_of("data.items"), JsonType::Array);
        assert_eq!(r.type_of("data"), JsonType::Object);
        assert_eq!(r.type_of("nope"), JsonType::Undefined);
    }

    #[test]
    fn test_number_satisfies_int_and_float() {
        assert!(JsonType::Int.satisfies("number"));
        assert!(JsonType::Float.satisfies("number"));
        assert!(JsonType::Int.satisfies("int"));
        assert!(!JsonType::String.satisfies("number"));
        assert!(!JsonType::Float.satisfies("int"));
    }

    #[test]
    fn test_get_string_and_counts() {
        let r = reader();
        assert_eq!(r.get_string("count"), "10");
        assert_eq!(r.get_string("active"), "true");
        assert_eq!(r.get_string("missing"), "");
        assert_eq!(r.get_string("nope"), "");
        assert_eq!(r.child_count("data.items"), 3);
        assert_eq!(r.child_count("data"), 1);
        assert_eq!(r.child_count("name"), 0);
        assert!(r.key_exists("missing"));
        assert!(!r.key_exists("nope"));
    }

    #[test]
    fn test_invalid_body_has_no_paths() {
        let r = JsonReader::parse("<html></html>");
        assert!(!r.is_valid());
        assert!(!r.key_exists(""));
        assert_eq!(r.type_of("name"), JsonType::Undefined);
    }
}
