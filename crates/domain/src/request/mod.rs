//! Invocation inputs: HTTP methods, parameter values and their collections.

mod method;
mod params;
mod value;

pub use method::HttpMethod;
pub use params::{Params, strip_disambiguation};
pub use value::{ParamValue, json_to_param_string};
