//! Apiprobe Domain - Core types
//!
//! This crate defines the model of an interface document, of the values a
//! caller binds to its operations, and of the envelope an executed call
//! produces. All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod operation;
pub mod request;
pub mod response;
pub mod testing;

pub use error::{CallError, DomainError, DomainResult, ErrorKind};
pub use operation::{
    DEFAULT_CONTENT_TYPE, DEFAULT_TAG, Operation, OperationIndex, ParameterLocation,
    ParameterSpec, Specifier,
};
pub use request::{HttpMethod, ParamValue, Params, json_to_param_string, strip_disambiguation};
pub use response::{
    Cookie, JsonReader, JsonResponse, JsonType, Response, ResponseState, canonical_header_name,
};
pub use testing::{CountComparison, FailureReporter, Failures, PanicReporter};
