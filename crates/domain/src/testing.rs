//! Failure reporting and comparison operators used by response assertions.

use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Receives assertion failures.
///
/// Assertions never fail on their own; they hand a message to a reporter,
/// which decides whether to collect it or abort the test.
pub trait FailureReporter {
    /// Records one failure.
    fn report(&self, message: String);
}

impl<R: FailureReporter + ?Sized> FailureReporter for &R {
    fn report(&self, message: String) {
        (**self).report(message);
    }
}

/// Collects failure messages for inspection after a chain has run.
#[derive(Debug, Default)]
pub struct Failures {
    messages: Mutex<Vec<String>>,
}

impl Failures {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded messages, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Number of recorded failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages().len()
    }

    /// Returns true if nothing failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Panics with every recorded message if anything failed.
    #[allow(clippy::panic)]
    pub fn assert_none(&self) {
        let messages = self.messages();
        if !messages.is_empty() {
            panic!(
                "{} expectation(s) failed:\n{}",
                messages.len(),
                messages.join("\n")
            );
        }
    }
}

impl FailureReporter for Failures {
    fn report(&self, message: String) {
        match self.messages.lock() {
            Ok(mut messages) => messages.push(message),
            Err(poisoned) => poisoned.into_inner().push(message),
        }
    }
}

/// Panics on the first failure, failing the enclosing test immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct PanicReporter;

impl FailureReporter for PanicReporter {
    #[allow(clippy::panic)]
    fn report(&self, message: String) {
        panic!("{message}");
    }
}

/// Operator for child-count assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountComparison {
    /// `=` or `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterOrEqual,
    /// `<`
    Less,
    /// `<=`
    LessOrEqual,
}

impl CountComparison {
    /// Get the symbol for this operator.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
        }
    }

    /// Applies `actual <op> expected`.
    #[must_use]
    pub const fn compare(self, actual: usize, expected: usize) -> bool {
        match self {
            Self::Equal => actual == expected,
            Self::NotEqual => actual != expected,
            Self::Greater => actual > expected,
            Self::GreaterOrEqual => actual >= expected,
            Self::Less => actual < expected,
            Self::LessOrEqual => actual <= expected,
        }
    }
}

impl fmt::Display for CountComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for CountComparison {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "=" | "==" => Ok(Self::Equal),
            "!=" => Ok(Self::NotEqual),
            ">" => Ok(Self::Greater),
            ">=" => Ok(Self::GreaterOrEqual),
            "<" => Ok(Self::Less),
            "<=" => Ok(Self::LessOrEqual),
            other => Err(DomainError::InvalidComparison(other.to_string())),
        }
    }
}
