//! Port implementations.

mod reqwest_transport;

pub use reqwest_transport::{MAX_REDIRECTS, ReqwestTransport};
