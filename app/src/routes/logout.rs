use turnstile_http::Response;

use super::{redirect, with_session_cookie};
use crate::state::ApplicationState;

/// End the session, if any, and go back to the login form.
pub fn post(state: &ApplicationState) -> Response {
    with_session_cookie(redirect("/"), state.sessions().clear(), state)
}
