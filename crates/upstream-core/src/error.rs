//! Error types module
//!
//! All decode failures are unified under the [`UploadError`] enum. Binding and
//! validation outcomes are deliberately *not* errors: they are reported as
//! data on [`BoundModel`](crate::bind::BoundModel).
//!
//! There are no retries anywhere in this library. The request body is a
//! single-pass, non-seekable stream, so nothing is recoverable by re-reading;
//! recovery (re-sending the request) is the host's responsibility.

/// Coarse classification of an [`UploadError`], for callers that map failures
/// onto transport-level handling (status codes, salvage policies) without
/// matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request is not a usable multipart request. Raised before any body
    /// byte is read.
    Protocol,
    /// The body's boundary framing is truncated or non-conformant mid-stream.
    MalformedBody,
    /// A configured ceiling was exceeded. Always fatal.
    LimitExceeded,
    /// The caller's per-file handler failed; its error is carried verbatim.
    Handler,
    /// The transport failed or was aborted while reading body bytes.
    Io,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("expected a multipart request, got `{0}`")]
    NotMultipart(String),

    #[error("missing content-type boundary")]
    MissingBoundary,

    #[error("multipart boundary length limit {limit} exceeded")]
    BoundaryTooLong { limit: usize },

    #[error("malformed multipart body: {0}")]
    MalformedBody(&'static str),

    #[error("multipart section header length limit {limit} exceeded")]
    HeadersTooLarge { limit: usize },

    #[error("form value length limit {limit} exceeded for field `{field}`")]
    ValueTooLong { field: String, limit: usize },

    #[error("form value count limit {limit} exceeded")]
    ValueCountExceeded { limit: usize },

    #[error("file handler failed: {0}")]
    Handler(anyhow::Error),

    #[error("body read failed: {0}")]
    Io(#[from] std::io::Error),
}

impl UploadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UploadError::NotMultipart(_) | UploadError::MissingBoundary => ErrorKind::Protocol,
            UploadError::MalformedBody(_) => ErrorKind::MalformedBody,
            UploadError::BoundaryTooLong { .. }
            | UploadError::HeadersTooLarge { .. }
            | UploadError::ValueTooLong { .. }
            | UploadError::ValueCountExceeded { .. } => ErrorKind::LimitExceeded,
            UploadError::Handler(_) => ErrorKind::Handler,
            UploadError::Io(_) => ErrorKind::Io,
        }
    }
}

/// Result type for decode operations
pub type UploadResult<T> = Result<T, UploadError>;
