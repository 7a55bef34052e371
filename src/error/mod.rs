//! Error types for nexttrack.
//!
//! - [`RequestError`]: a request could not be built
//! - [`StreamError`]: a session ended in its terminal error state
//! - [`ErrorOrigin`]: transport vs. server classification used in logs
//!
//! Frame-level problems are [`crate::sse::SseParseError`] and never end a
//! session. HTTP adapter failures are [`crate::traits::HttpError`] and
//! convert into [`StreamError`].

mod request;
mod stream;

pub use request::RequestError;
pub use stream::{ErrorOrigin, StreamError};
