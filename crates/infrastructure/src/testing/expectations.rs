//! Checks shared by plain and JSON envelopes.

use apiprobe_domain::{CallError, FailureReporter, JsonResponse, Response};
use regex::Regex;

/// Assertions available on every envelope.
pub trait Expectations: Sized {
    /// The underlying envelope.
    fn envelope(&self) -> &Response;

    /// The envelope, or `None` once the call has failed.
    fn clean(&self) -> Option<&Response> {
        let envelope = self.envelope();
        (!envelope.is_errored()).then_some(envelope)
    }

    /// Checks the envelope's error against `expected`; `None` expects success.
    #[must_use]
    fn expect_error(self, reporter: &impl FailureReporter, expected: Option<&CallError>) -> Self {
        match (expected, self.envelope().error()) {
            (None, None) => {}
            (None, Some(actual)) => {
                reporter.report(format!("expected no error, got error `{actual}` instead"));
            }
            (Some(expected), None) => {
                reporter.report(format!("expected error `{expected}`, had none instead"));
            }
            (Some(expected), Some(actual)) => {
                if expected != actual {
                    reporter.report(format!(
                        "expected error with message `{expected}`, got error with message `{actual}`"
                    ));
                }
            }
        }
        self
    }

    /// Runs a custom check. A returned non-empty message is a failure.
    ///
    /// The check runs on errored envelopes too, so it can inspect the error.
    #[must_use]
    fn expect<F>(self, reporter: &impl FailureReporter, evaluator: F) -> Self
    where
        F: FnOnce(&Self) -> Option<String>,
    {
        if let Some(message) = evaluator(&self).filter(|m| !m.is_empty()) {
            reporter.report(message);
        }
        self
    }

    /// Checks the status code.
    #[must_use]
    fn expect_status(self, reporter: &impl FailureReporter, status: u16) -> Self {
        if let Some(response) = self.clean()
            && response.status_code != status
        {
            reporter.report(format!(
                "expected statuscode '{status}', got '{}' instead",
                response.status_code
            ));
        }
        self
    }

    /// Checks that no header named `name` was received.
    #[must_use]
    fn expect_header_empty(self, reporter: &impl FailureReporter, name: &str) -> Self {
        if let Some(response) = self.clean()
            && response.header(name).is_some()
        {
            reporter.report(format!("expected no header with key '{name}' set"));
        }
        self
    }

    /// Checks that header `name` is present and equals `value`.
    #[must_use]
    fn expect_header_value(self, reporter: &impl FailureReporter, name: &str, value: &str) -> Self {
        if let Some(response) = self.clean() {
            match response.header(name) {
                None => reporter.report(format!("no header with key '{name}' set")),
                Some(actual) if actual != value => reporter.report(format!(
                    "expected header '{name}' to have value '{value}', got '{actual}' instead"
                )),
                Some(_) => {}
            }
        }
        self
    }

    /// Like [`Expectations::expect_header_value`], passing if the header is absent.
    #[must_use]
    fn optional_header_value(self, reporter: &impl FailureReporter, name: &str, value: &str) -> Self {
        if self.envelope().header(name).is_none() {
            return self;
        }
        self.expect_header_value(reporter, name, value)
    }

    /// Checks that header `name` is present and matches `pattern`.
    #[must_use]
    fn expect_header_match(self, reporter: &impl FailureReporter, name: &str, pattern: &Regex) -> Self {
        if let Some(response) = self.clean() {
            match response.header(name) {
                None => reporter.report(format!("no header with key '{name}' set")),
                Some(actual) if !pattern.is_match(actual) => reporter.report(format!(
                    "expect header match error: '{actual}' did not pass the regex test `{pattern}`"
                )),
                Some(_) => {}
            }
        }
        self
    }

    /// Like [`Expectations::expect_header_match`], passing if the header is absent.
    #[must_use]
    fn optional_header_match(self, reporter: &impl FailureReporter, name: &str, pattern: &Regex) -> Self {
        if self.envelope().header(name).is_none() {
            return self;
        }
        self.expect_header_match(reporter, name, pattern)
    }
}

impl Expectations for Response {
    fn envelope(&self) -> &Response {
        self
    }
}

impl Expectations for JsonResponse {
    fn envelope(&self) -> &Response {
        &self.response
    }
}
