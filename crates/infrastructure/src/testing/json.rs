//! Checks against the parsed body of a JSON envelope.

use apiprobe_domain::{CountComparison, FailureReporter, JsonResponse};
use regex::Regex;
use serde_json::Value;

use super::Expectations;

/// Assertions on values inside a JSON body, addressed by path
/// (`data.items[0].id`).
pub trait JsonExpectations: Expectations {
    /// Checks the JSON type at `path`. `"number"` accepts ints and floats.
    #[must_use]
    fn expect_type(self, reporter: &impl FailureReporter, path: &str, expected: &str) -> Self {
        self.expect_types(reporter, path, &[expected])
    }

    /// Checks that the JSON type at `path` is one of `expected`.
    #[must_use]
    fn expect_types(self, reporter: &impl FailureReporter, path: &str, expected: &[&str]) -> Self;

    /// Like [`JsonExpectations::expect_type`], passing if `path` does not exist.
    #[must_use]
    fn optional_type(self, reporter: &impl FailureReporter, path: &str, expected: &str) -> Self {
        self.optional_types(reporter, path, &[expected])
    }

    /// Like [`JsonExpectations::expect_types`], passing if `path` does not exist.
    #[must_use]
    fn optional_types(self, reporter: &impl FailureReporter, path: &str, expected: &[&str]) -> Self;

    /// Checks the value at `path`. Numbers compare numerically, so `1`
    /// equals `1.0`.
    #[must_use]
    fn expect_value(self, reporter: &impl FailureReporter, path: &str, expected: impl Into<Value>) -> Self;

    /// Checks the string form of the value at `path`. A missing path reads as
    /// the empty string.
    #[must_use]
    fn expect_value_string(self, reporter: &impl FailureReporter, path: &str, expected: &str) -> Self;

    /// Like [`JsonExpectations::expect_value`], passing if `path` does not exist.
    #[must_use]
    fn optional_value(self, reporter: &impl FailureReporter, path: &str, expected: impl Into<Value>) -> Self;

    /// Like [`JsonExpectations::expect_value_string`], passing if `path` does not exist.
    #[must_use]
    fn optional_value_string(self, reporter: &impl FailureReporter, path: &str, expected: &str) -> Self;

    /// Checks the string form of the value at `path` against `pattern`.
    #[must_use]
    fn expect_value_match(self, reporter: &impl FailureReporter, path: &str, pattern: &Regex) -> Self;

    /// Like [`JsonExpectations::expect_value_match`], passing if `path` does not exist.
    #[must_use]
    fn optional_value_match(self, reporter: &impl FailureReporter, path: &str, pattern: &Regex) -> Self;

    /// Checks that the array or object at `path` has exactly `count` children.
    #[must_use]
    fn expect_value_count(self, reporter: &impl FailureReporter, path: &str, count: usize) -> Self {
        self.expect_value_count_compare(reporter, path, "=", count)
    }

    /// Compares the child count at `path` with `count` using one of
    /// `=, ==, !=, >, >=, <, <=`.
    #[must_use]
    fn expect_value_count_compare(
        self,
        reporter: &impl FailureReporter,
        path: &str,
        comparison: &str,
        count: usize,
    ) -> Self;
}

impl JsonExpectations for JsonResponse {
    fn expect_types(self, reporter: &impl FailureReporter, path: &str, expected: &[&str]) -> Self {
        if self.clean().is_none() {
            return self;
        }
        let actual = self.reader.type_of(path);
        if !expected.iter().any(|typ| actual.satisfies(typ)) {
            reporter.report(format!(
                "expected value at key `{path}` to be `{}`, got `{actual}` instead",
                expected.join(", ")
            ));
        }
        self
    }

    fn optional_types(self, reporter: &impl FailureReporter, path: &str, expected: &[&str]) -> Self {
        if !self.reader.key_exists(path) {
            return self;
        }
        self.expect_types(reporter, path, expected)
    }

    fn expect_value(self, reporter: &impl FailureReporter, path: &str, expected: impl Into<Value>) -> Self {
        if self.clean().is_none() {
            return self;
        }
        let expected = expected.into();
        match self.reader.get(path) {
            None => reporter.report(format!("no value at key `{path}`, expected '{expected}'")),
            Some(actual) if !json_values_equal(actual, &expected) => {
                reporter.report(format!("expected '{expected}' to equal '{actual}' at key `{path}`"));
            }
            Some(_) => {}
        }
        self
    }

    fn expect_value_string(self, reporter: &impl FailureReporter, path: &str, expected: &str) -> Self {
        if self.clean().is_none() {
            return self;
        }
        let actual = self.reader.get_string(path);
        if actual != expected {
            reporter.report(format!("expected '{expected}' to equal '{actual}' at key `{path}`"));
        }
        self
    }

    fn optional_value(self, reporter: &impl FailureReporter, path: &str, expected: impl Into<Value>) -> Self {
        if !self.reader.key_exists(path) {
            return self;
        }
        self.expect_value(reporter, path, expected)
    }

    fn optional_value_string(self, reporter: &impl FailureReporter, path: &str, expected: &str) -> Self {
        if !self.reader.key_exists(path) {
            return self;
        }
        self.expect_value_string(reporter, path, expected)
    }

    fn expect_value_match(self, reporter: &impl FailureReporter, path: &str, pattern: &Regex) -> Self {
        if self.clean().is_none() {
            return self;
        }
        let actual = self.reader.get_string(path);
        if !pattern.is_match(&actual) {
            reporter.report(format!(
                "expect value match error: '{actual}' did not pass the regex test `{pattern}`"
            ));
        }
        self
    }

    fn optional_value_match(self, reporter: &impl FailureReporter, path: &str, pattern: &Regex) -> Self {
        if !self.reader.key_exists(path) {
            return self;
        }
        self.expect_value_match(reporter, path, pattern)
    }

    fn expect_value_count_compare(
        self,
        reporter: &impl FailureReporter,
        path: &str,
        comparison: &str,
        count: usize,
    ) -> Self {
        if self.clean().is_none() {
            return self;
        }
        let comparison = match comparison.parse::<CountComparison>() {
            Ok(comparison) => comparison,
            Err(e) => {
                reporter.report(e.to_string());
                return self;
            }
        };
        let actual = self.reader.child_count(path);
        if !comparison.compare(actual, count) {
            reporter.report(format!(
                "expected item count at key `{path}` {comparison} {count}, found {actual}"
            ));
        }
        self
    }
}

/// Structural equality where numbers compare by value rather than
/// representation.
#[allow(clippy::float_cmp)]
fn json_values_equal(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => {
            if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
                a == b
            } else if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
                a == b
            } else {
                a.as_f64() == b.as_f64()
            }
        }
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| json_values_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(k, x)| b.get(k).is_some_and(|y| json_values_equal(x, y)))
        }
        _ => actual == expected,
    }
}
