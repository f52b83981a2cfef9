use turnstile_http::Response;
use turnstile_http::request::RequestHead;
use turnstile_http::request::body::{FormEncoding, FormValues};
use turnstile_session::Credentials;

use super::{redirect, with_session_cookie};
use crate::state::ApplicationState;

/// Start a session for the submitted credentials.
///
/// `name` and `password` are looked up like browser form values: the first value
/// submitted for a field wins, even if it's empty.
/// On success the client gets a session cookie and is sent to `/internal`.
/// Any failure, including a body we can't read, sends the client back to `/`.
pub async fn post<B>(head: &RequestHead, body: B, state: &ApplicationState) -> Response
where
    B: hyper::body::Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let form = read_form(head, body, state).await;
    let credentials = Credentials::new(
        form.first("name").unwrap_or_default(),
        form.first("password").unwrap_or_default(),
    );
    let Some(user) = credentials.authenticate() else {
        return redirect("/");
    };
    match state.sessions().establish(&user) {
        Ok(directive) => with_session_cookie(redirect("/internal"), directive, state),
        Err(e) => {
            tracing_log_error::log_error!(
                e,
                level: tracing::Level::WARN,
                "Failed to encode the session cookie, the user stays anonymous"
            );
            redirect("/")
        }
    }
}

/// Collect the values from the query string and, for form bodies, from the body.
///
/// Bodies of any other content type are never read.
async fn read_form<B>(head: &RequestHead, body: B, state: &ApplicationState) -> FormValues
where
    B: hyper::body::Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let query = FormValues::from_query(head);
    let Some(encoding) = FormEncoding::of(head) else {
        return query;
    };
    let submitted =
        match FormValues::from_body(&encoding, head, body, state.body_size_limit()).await {
            Ok(submitted) => submitted,
            Err(e) => {
                tracing_log_error::log_error!(
                    e,
                    level: tracing::Level::DEBUG,
                    "Failed to read the login form, ignoring its body"
                );
                FormValues::default()
            }
        };
    FormValues::combine(Some(&encoding), query, submitted)
}
