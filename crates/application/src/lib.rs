//! Apiprobe Application - Binding and execution
//!
//! This crate defines the application layer with:
//! - The HTTP transport port
//! - Client configuration
//! - The parameter binder and request executor
//! - The `ApiClient` entry point

pub mod binder;
pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod ports;

pub use binder::{BoundRequest, bind};
pub use client::{ApiClient, IDENTITY_HEADER_VALUE};
pub use config::ClientConfig;
pub use error::{ApplicationError, ApplicationResult};
pub use executor::execute_request;
pub use ports::{HttpTransport, OutgoingRequest, RawResponse, TransportError};
