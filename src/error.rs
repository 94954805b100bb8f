//! Error types for the VAPIX core.
//!
//! All errors are strongly typed using thiserror. The taxonomy mirrors how a
//! device answers: transport failures (the device is unreachable), response
//! failures (the device answered with something we cannot decode), and the
//! access-level failures that merely mean an endpoint is absent on this
//! device or account.

use thiserror::Error;

/// Transport-level failures raised by the networking collaborator.
///
/// These indicate the device may be unreachable and are never swallowed by
/// the endpoint orchestrator.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The connection could not be established or broke mid-request.
    #[error("Connection failed: {message}")]
    Connection {
        /// Collaborator-supplied detail.
        message: String,
    },

    /// The request did not complete within the collaborator's deadline.
    #[error("Request timed out after {duration_ms}ms")]
    Timeout {
        /// Elapsed time before the deadline fired.
        duration_ms: u64,
    },
}

/// Payload-level failures: the device answered, but with a body we cannot
/// turn into typed items or events.
#[derive(Debug, Error)]
pub enum ResponseError {
    /// A metadata-stream body was not well-formed XML.
    #[error("Malformed XML: {message}")]
    MalformedXml {
        /// Parser detail.
        message: String,
    },

    /// A raw record was missing a key the item type requires.
    #[error("Missing key '{key}' in raw record")]
    MissingKey {
        /// The absent key.
        key: String,
    },

    /// A payload had a shape the decoder does not recognize.
    #[error("Unexpected payload shape: {message}")]
    UnexpectedShape {
        /// What was found instead.
        message: String,
    },

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ResponseError {
    /// Creates a missing-key error.
    #[must_use]
    pub fn missing_key(key: impl Into<String>) -> Self {
        Self::MissingKey { key: key.into() }
    }

    /// Creates a malformed-XML error.
    #[must_use]
    pub fn malformed_xml(message: impl Into<String>) -> Self {
        Self::MalformedXml {
            message: message.into(),
        }
    }

    /// Creates an unexpected-shape error.
    #[must_use]
    pub fn unexpected_shape(message: impl Into<String>) -> Self {
        Self::UnexpectedShape {
            message: message.into(),
        }
    }
}

/// Top-level error type for the VAPIX core.
#[derive(Debug, Error)]
pub enum VapixError {
    /// Credentials were rejected outright.
    #[error("Unauthorized")]
    Unauthorized,

    /// The account exists but lacks rights to this endpoint.
    #[error("Forbidden")]
    Forbidden,

    /// The device firmware does not expose this endpoint.
    #[error("Path not found: {path}")]
    PathNotFound {
        /// The endpoint path that was requested.
        path: String,
    },

    /// Transport failure.
    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    /// Undecodable response body.
    #[error("Response error: {0}")]
    Response(#[from] ResponseError),

    /// Invariant violation inside the core itself.
    #[error("Internal error: {message}")]
    Internal {
        /// What went wrong.
        message: String,
    },
}

impl VapixError {
    /// Creates a path-not-found error.
    #[must_use]
    pub fn path_not_found(path: impl Into<String>) -> Self {
        Self::PathNotFound { path: path.into() }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this failure means "the endpoint is not available on
    /// this device or for this account" rather than "something broke".
    ///
    /// The endpoint orchestrator converts exactly these failures into a
    /// quiet `false` return; everything else propagates.
    #[must_use]
    pub const fn is_capability_absent(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized | Self::Forbidden | Self::PathNotFound { .. }
        )
    }

    /// Returns true if retrying the same request could plausibly succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Request(_))
    }
}

/// Result type alias for VAPIX core operations.
pub type VapixResult<T> = Result<T, VapixError>;
