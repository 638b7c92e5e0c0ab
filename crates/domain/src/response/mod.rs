//! Response envelopes and the JSON reader used by assertions.

mod json;
mod spec;

pub use json::{JsonReader, JsonType};
pub use spec::{Cookie, Response, ResponseState, canonical_header_name};

/// A [`Response`] whose body was also parsed as JSON.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonResponse {
    /// The plain envelope.
    pub response: Response,
    /// Reader over the parsed body. Empty if the body is not JSON.
    pub reader: JsonReader,
}

impl JsonResponse {
    /// Parses the body of `response`.
    #[must_use]
    pub fn new(response: Response) -> Self {
        let reader = JsonReader::parse(&response.body);
        Self { response, reader }
    }
}

impl From<Response> for JsonResponse {
    fn from(response: Response) -> Self {
        Self::new(response)
    }
}
