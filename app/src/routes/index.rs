use turnstile_http::Response;
use turnstile_http::connection::ConnectionInfo;
use turnstile_http::request::RequestHead;
use turnstile_session::Identity;

use super::{identity, page_context, redirect};
use crate::state::ApplicationState;
use crate::telemetry::error_logger;

/// The landing page.
///
/// Authenticated users are sent straight to `/internal`; everybody else gets the login form.
pub fn get(head: &RequestHead, connection: &ConnectionInfo, state: &ApplicationState) -> Response {
    if let Identity::Authenticated(_) = identity(head, state) {
        return redirect("/internal");
    }
    match state.pages().index(&page_context(head, connection, state)) {
        Ok(page) => Response::ok().set_typed_body(page),
        Err(e) => {
            error_logger(&e, "Failed to render the index page");
            Response::internal_server_error()
        }
    }
}
