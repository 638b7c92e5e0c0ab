//! Response assertions.
//!
//! Chainable checks over a [`Response`](apiprobe_domain::Response) or
//! [`JsonResponse`](apiprobe_domain::JsonResponse). Each check hands failures
//! to a [`FailureReporter`](apiprobe_domain::FailureReporter) and returns the
//! envelope unchanged. Once an envelope carries an error, every check except
//! `expect_error` and `expect` passes through silently.

mod expectations;
mod json;

pub use expectations::Expectations;
pub use json::JsonExpectations;
