//! Error types for the edge decision core.
//!
//! [`EdgeError`] covers everything the pipeline can refuse to do. Each
//! variant maps to exactly one HTTP status via [`EdgeError::status`]; the
//! HTTP layer serializes the mapping without further interpretation.
//!
//! Note what is *not* here: a missing origin object is not an error at this
//! level. Absence is handled inside the pipeline by the fallback stage and
//! surfaces as a regular 404 response. Only the failure modes the fallback
//! cannot absorb escape as `EdgeError`.

use http::StatusCode;

/// Errors produced by the edge request pipeline.
#[derive(Debug, thiserror::Error)]
pub enum EdgeError {
    /// The request method is outside the configured safe set.
    #[error("method not allowed: {method}")]
    MethodNotAllowed {
        /// The rejected method.
        method: String,
    },

    /// The request path is malformed. Paths must be non-empty and begin
    /// with `/`.
    #[error("invalid request path: {path:?}")]
    InvalidPath {
        /// The offending path.
        path: String,
    },

    /// The configured fallback document itself is absent from the origin.
    ///
    /// This is a deployment defect, not a missing page, and is never
    /// re-mapped through the fallback stage.
    #[error("fallback document missing from origin: {path}")]
    FallbackDocumentMissing {
        /// Origin key of the absent fallback document.
        path: String,
    },

    /// The origin store failed, as opposed to reporting a missing key.
    #[error("origin unavailable: {reason}")]
    OriginUnavailable {
        /// Human-readable failure description.
        reason: String,
    },

    /// Invalid configuration, detected at provisioning time.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal error with context.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl EdgeError {
    /// The HTTP status this error surfaces as.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::InvalidPath { .. } => StatusCode::BAD_REQUEST,
            Self::OriginUnavailable { .. } => StatusCode::BAD_GATEWAY,
            Self::FallbackDocumentMissing { .. } | Self::Config(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Convenience result type for edge operations.
pub type EdgeResult<T> = Result<T, EdgeError>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
