use http::header::{CONTENT_TYPE, IntoHeaderName};
use http::{HeaderMap, HeaderValue, StatusCode};

use super::ResponseBody;
use super::body::TypedBody;

/// Represents an HTTP response.
///
/// ```rust
/// use turnstile_http::Response;
/// use turnstile_http::http::{HeaderValue, header::SERVER};
///
/// // Status code `OK`, the `Server` header set to `turnstile`,
/// // `Content-Type` set to `text/plain; charset=utf-8` and `Hello, world!` as body.
/// let response = Response::ok()
///     .insert_header(SERVER, HeaderValue::from_static("turnstile"))
///     .set_typed_body("Hello, world!");
/// ```
///
/// Bodies are fully buffered: every response is sent with a `Content-Length`.
#[derive(Debug)]
pub struct Response {
    inner: http::Response<ResponseBody>,
}

impl Response {
    /// Build a new [`Response`] with the given status code and an empty body.
    ///
    /// Use the shorthands for common status codes (e.g. [`Response::ok`]) when possible.
    pub fn new(status_code: StatusCode) -> Self {
        let mut inner = http::Response::new(ResponseBody::default());
        *inner.status_mut() = status_code;
        Self { inner }
    }

    /// Change the status code of the [`Response`].
    pub fn set_status(mut self, status: StatusCode) -> Self {
        *self.inner.status_mut() = status;
        self
    }

    /// Append a value to a [`Response`] header.
    ///
    /// Existing values for the same header are preserved.
    pub fn append_header(mut self, key: impl IntoHeaderName, value: HeaderValue) -> Self {
        self.inner.headers_mut().append(key, value);
        self
    }

    /// Insert a header value, replacing any existing value for the same header.
    pub fn insert_header(mut self, key: impl IntoHeaderName, value: HeaderValue) -> Self {
        self.inner.headers_mut().insert(key, value);
        self
    }

    /// Set the body of the [`Response`], along with the matching `Content-Type` header.
    pub fn set_typed_body<Body: TypedBody>(mut self, body: Body) -> Self {
        self.inner
            .headers_mut()
            .insert(CONTENT_TYPE, body.content_type());
        *self.inner.body_mut() = ResponseBody::new(body.into_bytes());
        self
    }

    /// Get a mutable reference to the [`Response`] headers.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        self.inner.headers_mut()
    }

    /// The [`Response`] status code.
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    /// Get a reference to the [`Response`] headers.
    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }
}

impl From<Response> for http::Response<ResponseBody> {
    fn from(res: Response) -> Self {
        res.inner
    }
}

macro_rules! shorthand {
    ($($name:ident => $status:ident),+ $(,)?) => {
        $(
            #[doc = concat!("Start building a new [`Response`] with [`", stringify!($status), "`](`StatusCode::", stringify!($status), "`) as status code.")]
            pub fn $name() -> Response {
                Response::new(StatusCode::$status)
            }
        )+
    };
}

/// Shorthands for building a new [`Response`] using a well-known status code.
impl Response {
    shorthand!(
        ok => OK,
        found => FOUND,
        not_found => NOT_FOUND,
        method_not_allowed => METHOD_NOT_ALLOWED,
        internal_server_error => INTERNAL_SERVER_ERROR,
    );
}
