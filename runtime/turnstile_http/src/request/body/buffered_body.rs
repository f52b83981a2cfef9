use bytes::Bytes;
use http::header::CONTENT_LENGTH;
use http_body_util::{BodyExt, Limited};
use ubyte::ByteUnit;

use crate::request::RequestHead;

use super::BodySizeLimit;
use super::errors::{ExtractBufferedBodyError, SizeLimitExceeded, UnexpectedBufferError};

/// Buffer the entire body of an incoming request in memory.
///
/// # Body size limit
///
/// To prevent denial-of-service attacks, the body is buffered only up to the
/// [`BodySizeLimit`] passed to [`BufferedBody::extract`]. When the limit is breached,
/// the extraction fails with [`SizeLimitExceeded`] and the rest of the body is left unread.
#[derive(Debug)]
#[non_exhaustive]
pub struct BufferedBody {
    /// The buffer of bytes that represents the body of the incoming request.
    pub bytes: Bytes,
}

impl BufferedBody {
    /// Read the body of the incoming request, enforcing `body_size_limit`.
    pub async fn extract<B>(
        request_head: &RequestHead,
        body: B,
        body_size_limit: BodySizeLimit,
    ) -> Result<Self, ExtractBufferedBodyError>
    where
        B: hyper::body::Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        match body_size_limit {
            BodySizeLimit::Enabled { max_size } => {
                Self::extract_with_limit(request_head, body, max_size).await
            }
            BodySizeLimit::Disabled => match body.collect().await {
                Ok(collected) => Ok(Self {
                    bytes: collected.to_bytes(),
                }),
                Err(e) => Err(UnexpectedBufferError { source: e.into() }.into()),
            },
        }
    }

    async fn extract_with_limit<B>(
        request_head: &RequestHead,
        body: B,
        max_size: ByteUnit,
    ) -> Result<Self, ExtractBufferedBodyError>
    where
        B: hyper::body::Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let content_length = request_head
            .headers
            .get(CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok()?.parse::<usize>().ok());

        let limit_error = || SizeLimitExceeded {
            max_size,
            content_length,
        };

        // Reject early if the client announces a body that is too large.
        if let Some(len) = content_length {
            if len > max_size {
                return Err(limit_error().into());
            }
        }

        // Saturate on platforms where `usize` is narrower than `u64`.
        let max_n_bytes = max_size.as_u64().try_into().unwrap_or(usize::MAX);
        // `Content-Length` can lie, or be missing: keep counting while buffering.
        let limited_body = Limited::new(body, max_n_bytes);
        match limited_body.collect().await {
            Ok(collected) => Ok(Self {
                bytes: collected.to_bytes(),
            }),
            Err(e) => {
                if e.downcast_ref::<http_body_util::LengthLimitError>()
                    .is_some()
                {
                    Err(limit_error().into())
                } else {
                    Err(UnexpectedBufferError { source: e }.into())
                }
            }
        }
    }
}

impl From<BufferedBody> for Bytes {
    fn from(buffered_body: BufferedBody) -> Self {
        buffered_body.bytes
    }
}
