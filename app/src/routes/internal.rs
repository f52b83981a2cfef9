use turnstile_http::Response;
use turnstile_http::connection::ConnectionInfo;
use turnstile_http::request::RequestHead;
use turnstile_session::Identity;

use super::{identity, page_context, redirect};
use crate::state::ApplicationState;
use crate::telemetry::error_logger;

/// The page reserved to authenticated users.
///
/// Anonymous visitors are redirected to the login form.
pub fn get(head: &RequestHead, connection: &ConnectionInfo, state: &ApplicationState) -> Response {
    let Identity::Authenticated(user) = identity(head, state) else {
        return redirect("/");
    };
    match state
        .pages()
        .internal(&page_context(head, connection, state), &user)
    {
        Ok(page) => Response::ok().set_typed_body(page),
        Err(e) => {
            error_logger(&e, "Failed to render the internal page");
            Response::internal_server_error()
        }
    }
}
