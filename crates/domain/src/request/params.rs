//! Named parameter values supplied for one invocation.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

use super::ParamValue;

/// Matches the `{N}` marker that lets one logical query parameter be
/// supplied more than once, e.g. `filter` and `filter{1}`.
static DISAMBIGUATION_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\{\d+\}").unwrap()
});

/// Removes every `{N}` disambiguation marker from a parameter name.
#[must_use]
pub fn strip_disambiguation(name: &str) -> String {
    DISAMBIGUATION_SUFFIX.replace_all(name, "").into_owned()
}

/// An insertion-ordered collection of parameter values keyed by name.
///
/// Keys keep their disambiguation suffix so that `filter{0}` and
/// `filter{1}` stay distinct entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    items: IndexMap<String, ParamValue>,
}

impl Params {
    /// Creates an empty parameter collection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: IndexMap::new(),
        }
    }

    /// Adds a parameter (builder pattern).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Adds or replaces a parameter.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.items.insert(name.into(), value.into());
    }

    /// Returns the value supplied under the exact name, suffix included.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.items.get(name)
    }

    /// Iterates over parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.items.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            items: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strip_disambiguation() {
        assert_eq!(strip_disambiguation("filter{1}"), "filter");
        assert_eq!(strip_disambiguation("filter{12}"), "filter");
        assert_eq!(strip_disambiguation("filter"), "filter");
        assert_eq!(strip_disambiguation("filter{x}"), "filter{x}");
    }

    #[test]
    fn test_params_keep_insertion_order() {
        let params = Params::new()
            .with("filter{10}", "c")
            .with("filter{2}", "b")
            .with("filter", "a");

        let names: Vec<_> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["filter{10}", "filter{2}", "filter"]);
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_get_uses_exact_names() {
        let params = Params::new().with("filter{1}", "x");
        assert_eq!(params.get("filter{1}"), Some(&ParamValue::from("x")));
        assert!(params.get("filter").is_none());
    }

    #[test]
    fn test_from_iterator() {
        let params: Params = [("id", 1), ("page", 2)].into_iter().collect();
        assert_eq!(params.get("page"), Some(&ParamValue::Int(2)));
    }
}
