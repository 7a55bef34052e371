//! Errors that end a recommendation session.
//!
//! Every variant ends the session in the same terminal state (the message
//! lands in `StreamState::error`), but they come from two different
//! places: the transport (connection, HTTP status, interrupted body) or
//! the recommendation service itself via an `Error` event. [`ErrorOrigin`]
//! keeps the two apart in logs.

use std::fmt;

use thiserror::Error;

use crate::traits::HttpError;

/// Where a terminal error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorOrigin {
    /// Connection, HTTP status, or body read failure.
    Transport,
    /// The service reported the failure on its own event channel.
    Server,
}

impl ErrorOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorOrigin::Transport => "transport",
            ErrorOrigin::Server => "server",
        }
    }
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal session errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StreamError {
    /// The request body could not be encoded.
    #[error("failed to encode request: {message}")]
    Encode { message: String },

    /// The request never reached the service.
    #[error("connection failed: {message}")]
    ConnectionFailed { message: String },

    /// The service answered with a non-success status.
    #[error("HTTP error! status: {status}")]
    HttpStatus { status: u16, body: String },

    /// The body stopped mid-stream with a read error.
    #[error("connection lost: {message}")]
    ConnectionLost { message: String },

    /// The body ended cleanly but no `Complete` or `Error` event arrived.
    #[error("stream ended before recommendations were complete")]
    EndedEarly,

    /// `Error` event sent by the service.
    #[error("server reported: {message}")]
    ServerReported { message: String },
}

impl StreamError {
    pub fn origin(&self) -> ErrorOrigin {
        match self {
            StreamError::ServerReported { .. } => ErrorOrigin::Server,
            _ => ErrorOrigin::Transport,
        }
    }

    /// Text stored in the session state for the UI to render.
    ///
    /// Server-reported messages are passed through verbatim.
    pub fn user_message(&self) -> String {
        match self {
            StreamError::Encode { message } => {
                format!("Could not encode the request: {}", message)
            }
            StreamError::ConnectionFailed { message } => {
                format!("Could not connect to the recommendation service: {}", message)
            }
            StreamError::HttpStatus { status, body } if body.trim().is_empty() => {
                format!("HTTP error! status: {}", status)
            }
            StreamError::HttpStatus { status, body } => {
                format!("HTTP error! status: {} ({})", status, body.trim())
            }
            StreamError::ConnectionLost { message } => {
                format!("Connection lost: {}", message)
            }
            StreamError::EndedEarly => {
                "Stream ended before recommendations were complete".to_string()
            }
            StreamError::ServerReported { message } if message.trim().is_empty() => {
                "The recommendation service reported an unspecified error".to_string()
            }
            StreamError::ServerReported { message } => message.clone(),
        }
    }

    /// Short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::Encode { .. } => "E_STREAM_ENCODE",
            StreamError::ConnectionFailed { .. } => "E_STREAM_CONNECT",
            StreamError::HttpStatus { .. } => "E_STREAM_STATUS",
            StreamError::ConnectionLost { .. } => "E_STREAM_CONN",
            StreamError::EndedEarly => "E_STREAM_EOF",
            StreamError::ServerReported { .. } => "E_STREAM_BACKEND",
        }
    }
}

impl From<HttpError> for StreamError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::ServerError { status, message } => StreamError::HttpStatus {
                status,
                body: message,
            },
            HttpError::Io(message) => StreamError::ConnectionLost { message },
            other => StreamError::ConnectionFailed {
                message: other.to_string(),
            },
        }
    }
}
