//! Errors that can occur while extracting information from the request body.
use ubyte::ByteUnit;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// The error returned by [`BufferedBody::extract`](super::BufferedBody::extract) when
/// the extraction fails.
pub enum ExtractBufferedBodyError {
    #[error(transparent)]
    /// See [`SizeLimitExceeded`] for details.
    SizeLimitExceeded(#[from] SizeLimitExceeded),
    #[error(transparent)]
    /// See [`UnexpectedBufferError`] for details.
    UnexpectedBufferError(#[from] UnexpectedBufferError),
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// The error returned by [`FormValues::from_body`](super::FormValues::from_body) when
/// the extraction fails.
pub enum ExtractFormError {
    #[error(transparent)]
    /// The body couldn't be buffered. See [`ExtractBufferedBodyError`] for details.
    Buffer(#[from] ExtractBufferedBodyError),
    #[error(transparent)]
    /// See [`MultipartFormError`] for details.
    Multipart(#[from] MultipartFormError),
}

#[derive(Debug, thiserror::Error)]
#[error("The request body is larger than the maximum size limit enforced by this server.")]
#[non_exhaustive]
/// The request body is larger than the maximum size limit enforced by this server.
pub struct SizeLimitExceeded {
    /// The maximum size limit enforced by this server.
    pub max_size: ByteUnit,
    /// The value of the `Content-Length` header for the request that breached the body
    /// size limit.
    ///
    /// It's set to `None` if the `Content-Length` header was missing or invalid.
    /// If it's set to `Some(n)` and `n` is smaller than `max_size`, then the request
    /// lied about the size of its body in the `Content-Length` header.
    pub content_length: Option<usize>,
}

#[derive(Debug, thiserror::Error)]
#[error("Something went wrong while reading the request body.")]
#[non_exhaustive]
/// Something went wrong while reading the request body, but we don't know what specifically.
pub struct UnexpectedBufferError {
    #[source]
    pub(super) source: Box<dyn std::error::Error + Send + Sync>,
}

#[derive(Debug, thiserror::Error)]
#[error("Failed to parse the body as a multipart form.")]
#[non_exhaustive]
/// The body claims to be `multipart/form-data`, but it isn't well-formed.
pub struct MultipartFormError {
    #[source]
    pub(super) source: multer::Error,
}
