//! Read cookies from requests and attach cookies to responses.
//!
//! Parsing and formatting are delegated to [`biscotti`]; the [`Processor`] controls
//! how values are encoded on the wire.
use biscotti::errors::ParseError;
pub use biscotti::{Processor, ProcessorConfig, RequestCookies, ResponseCookie, ResponseCookies};
use http::HeaderValue;
use http::header::{COOKIE, SET_COOKIE, ToStrError};
use tracing_log_error::log_error;

use crate::Response;
use crate::request::RequestHead;

#[derive(Debug, thiserror::Error)]
/// A `Cookie` header that couldn't be parsed.
pub enum ExtractRequestCookiesError {
    #[error("Some characters in the `Cookie` header aren't printable ASCII characters.")]
    InvalidHeaderValue(#[from] ToStrError),
    #[error("Failed to parse request cookies out of the `Cookie` header.")]
    ParseError(#[from] ParseError),
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
#[error("Some characters in the `Set-Cookie` header value are not printable ASCII characters.")]
/// The error returned by [`inject_response_cookies`].
pub struct InjectResponseCookiesError {
    /// The invalid header value.
    pub invalid_header_value: String,
}

/// Collect the cookies sent by the client.
///
/// Every `Cookie` header is parsed on its own. A header that fails to parse is logged
/// and skipped: one broken cookie must not turn the whole request into an error.
pub fn extract_request_cookies<'request>(
    request_head: &'request RequestHead,
    processor: &Processor,
) -> RequestCookies<'request> {
    fn extract_request_cookie<'request>(
        header: &'request HeaderValue,
        processor: &Processor,
        cookies: &mut RequestCookies<'request>,
    ) -> Result<(), ExtractRequestCookiesError> {
        let header = header.to_str()?;
        cookies.extend_from_header(header, processor)?;
        Ok(())
    }

    let mut cookies = RequestCookies::new();
    for header in request_head.headers.get_all(COOKIE) {
        if let Err(e) = extract_request_cookie(header, processor, &mut cookies) {
            log_error!(
                e,
                level: tracing::Level::WARN,
                "A request cookie is invalid, ignoring it"
            );
        }
    }
    cookies
}

/// Append a `Set-Cookie` header to `response` for each cookie in `response_cookies`.
pub fn inject_response_cookies(
    mut response: Response,
    response_cookies: ResponseCookies,
    processor: &Processor,
) -> Result<Response, InjectResponseCookiesError> {
    for value in response_cookies.header_values(processor) {
        let value = HeaderValue::from_str(&value).map_err(|_| InjectResponseCookiesError {
            invalid_header_value: value,
        })?;
        response = response.append_header(SET_COOKIE, value);
    }
    Ok(response)
}
