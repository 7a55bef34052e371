//! Mock implementations for testing.
//!
//! - [`MockHttpClient`] - streaming HTTP client with scripted chunk sequences

pub mod http;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
