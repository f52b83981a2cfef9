//! Typed response bodies, which know their own `Content-Type`.
use std::borrow::Cow;

use bytes::Bytes;
use http::HeaderValue;
use mime::{TEXT_HTML_UTF_8, TEXT_PLAIN_UTF_8};

/// A body that knows which `Content-Type` it should be served with.
///
/// Use it with [`Response::set_typed_body`](super::Response::set_typed_body).
pub trait TypedBody {
    /// The value of the `Content-Type` header for this body.
    fn content_type(&self) -> HeaderValue;

    /// The raw bytes to send over the wire.
    fn into_bytes(self) -> Bytes;
}

/// A body with `Content-Type` set to `text/html; charset=utf-8`.
///
/// # Example
///
/// ```rust
/// use turnstile_http::response::{Response, body::Html};
/// use turnstile_http::http::header::CONTENT_TYPE;
///
/// let html: Html = "<h1>Hey there!</h1>".into();
/// let response = Response::ok().set_typed_body(html);
///
/// assert_eq!(response.headers()[CONTENT_TYPE], "text/html; charset=utf-8");
/// ```
#[derive(Debug, Clone)]
pub struct Html(Bytes);

impl From<String> for Html {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&'static str> for Html {
    fn from(s: &'static str) -> Self {
        Self(Bytes::from_static(s.as_bytes()))
    }
}

impl From<Cow<'static, str>> for Html {
    fn from(s: Cow<'static, str>) -> Self {
        match s {
            Cow::Borrowed(s) => s.into(),
            Cow::Owned(s) => s.into(),
        }
    }
}

impl TypedBody for Html {
    fn content_type(&self) -> HeaderValue {
        HeaderValue::from_static(TEXT_HTML_UTF_8.as_ref())
    }

    fn into_bytes(self) -> Bytes {
        self.0
    }
}

impl TypedBody for String {
    fn content_type(&self) -> HeaderValue {
        HeaderValue::from_static(TEXT_PLAIN_UTF_8.as_ref())
    }

    fn into_bytes(self) -> Bytes {
        self.into()
    }
}

impl TypedBody for &'static str {
    fn content_type(&self) -> HeaderValue {
        HeaderValue::from_static(TEXT_PLAIN_UTF_8.as_ref())
    }

    fn into_bytes(self) -> Bytes {
        Bytes::from_static(self.as_bytes())
    }
}
