//! Request handlers, one module per route.
use http::HeaderValue;
use http::header::LOCATION;
use turnstile_http::Response;
use turnstile_http::connection::ConnectionInfo;
use turnstile_http::cookie::{ResponseCookies, extract_request_cookies, inject_response_cookies};
use turnstile_http::request::RequestHead;
use turnstile_session::{CookieDirective, Identity};

use crate::pages::PageContext;
use crate::state::ApplicationState;
use crate::telemetry::error_logger;

pub mod health;
pub mod index;
pub mod internal;
pub mod login;
pub mod logout;

/// Who sent the request, according to its session cookie.
pub(crate) fn identity(head: &RequestHead, state: &ApplicationState) -> Identity {
    let cookies = extract_request_cookies(head, state.cookie_processor());
    state.sessions().identity_of(&cookies)
}

/// The data shown on every page.
pub(crate) fn page_context<'a>(
    head: &RequestHead,
    connection: &ConnectionInfo,
    state: &'a ApplicationState,
) -> PageContext<'a> {
    PageContext::new(
        state.color(),
        connection.peer_addr(),
        &head.headers,
        state.served_from(),
    )
}

/// A `302 Found` pointing at `location`.
pub(crate) fn redirect(location: &'static str) -> Response {
    Response::found().insert_header(LOCATION, HeaderValue::from_static(location))
}

/// Attach the session cookie described by `directive` to `response`.
pub(crate) fn with_session_cookie(
    response: Response,
    directive: CookieDirective,
    state: &ApplicationState,
) -> Response {
    let mut cookies = ResponseCookies::new();
    cookies.insert(directive.into_cookie());
    match inject_response_cookies(response, cookies, state.cookie_processor()) {
        Ok(response) => response,
        Err(e) => {
            error_logger(&e, "Failed to attach the session cookie to the response");
            Response::internal_server_error()
        }
    }
}
