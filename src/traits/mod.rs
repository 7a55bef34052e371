//! Trait abstractions for dependency injection and testability.
//!
//! - [`HttpClient`] - streaming POST used by the session controller

pub mod http;

pub use http::{ByteStream, Headers, HttpClient, HttpError};
