//! Apiprobe Infrastructure - Adapters and implementations
//!
//! This crate provides the reqwest transport, environment configuration,
//! client construction from a document on disk, and the response assertion
//! chain used by integration tests.

pub mod adapters;
pub mod client_builder;
pub mod config;
pub mod testing;

pub use adapters::{MAX_REDIRECTS, ReqwestTransport};
pub use client_builder::{ClientBuilder, build_client};
pub use config::EnvConfigLoader;
pub use testing::{Expectations, JsonExpectations};
