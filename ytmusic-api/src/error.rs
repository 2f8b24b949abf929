//! Error types for the YouTube Music API client.

use thiserror::Error;
use ytmusic_core::JsonParseError;

/// Errors that can occur when interacting with the InnerTube API.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP transport error (connection refused, timeout, TLS failure, etc.).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success HTTP status.
    #[error("HTTP status {status}: {body}")]
    Status {
        status: u16,
        /// Leading part of the response body.
        body: String,
    },

    /// The response carried an InnerTube `error` object.
    ///
    /// Common codes:
    /// - `400`: malformed request or unknown browse id
    /// - `401`: cookie expired / `SAPISIDHASH` rejected
    /// - `404`: playlist or channel does not exist
    #[error("API error (code {code}): {message}")]
    Api { code: i64, message: String },

    /// A required field was missing or had the wrong type.
    #[error("unexpected response shape: {0}")]
    Parse(#[from] JsonParseError),

    /// The response body was not JSON, or the session file is corrupt.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O error (session read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The endpoint needs a logged-in session and none is configured.
    #[error("not logged in")]
    NotLoggedIn,

    /// The request was abandoned because its cancellation token fired.
    #[error("request cancelled")]
    Cancelled,

    /// Catch-all for other errors (e.g. missing config directory).
    #[error("{0}")]
    Other(String),
}

/// Convenience alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
