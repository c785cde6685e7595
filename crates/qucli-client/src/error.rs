//! Error types for Quay API operations.

use thiserror::Error;

/// Errors that can occur while talking to the Quay API.
///
/// None of these are retried; every variant is fatal to the command that
/// triggered it.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (DNS, connect, TLS, timeout).
    #[error("request to {url} failed: {source}")]
    Network {
        /// Request URL.
        url: String,
        /// Underlying error.
        #[source]
        source: reqwest::Error,
    },

    /// The registry answered with a non-2xx status.
    #[error("{url} returned {status}: {message}")]
    Status {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Response body, usually a JSON error document.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        /// Request URL.
        url: String,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// The configured API root or a derived endpoint is not a valid URL.
    #[error("invalid URL '{url}': {message}")]
    InvalidUrl {
        /// URL string.
        url: String,
        /// Parser message.
        message: String,
    },

    /// The token cannot be sent as an HTTP header value.
    #[error("API token contains characters not allowed in an HTTP header")]
    InvalidToken,

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {source}")]
    Setup {
        /// Underlying error.
        #[source]
        source: reqwest::Error,
    },
}
