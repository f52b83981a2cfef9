//! Request-scoped telemetry.
//!
//! Every request gets a root span, with field names following
//! [OpenTelemetry's semantic convention](https://opentelemetry.io/docs/specs/semconv/)
//! whenever possible, and a one-line access log entry.
use http::{HeaderName, Method, Version};
use tracing::Value;
use turnstile_http::Response;
use turnstile_http::connection::ConnectionInfo;
use turnstile_http::request::RequestHead;
use turnstile_http::telemetry::ServerRequestId;

use crate::routing::Route;

// Error fields, alongside the functions to compute their values.
pub use tracing_log_error::fields::*;

pub const CLIENT_ADDRESS: &str = "client.address";

pub const HTTP_REQUEST_METHOD: &str = "http.request.method";

pub const HTTP_REQUEST_SERVER_ID: &str = "http.request.server_id";

pub const HTTP_RESPONSE_STATUS_CODE: &str = "http.response.status_code";

pub const HTTP_ROUTE: &str = "http.route";

pub const NETWORK_PROTOCOL_VERSION: &str = "network.protocol.version";

pub const URL_PATH: &str = "url.path";

pub const URL_QUERY: &str = "url.query";

pub const USER_AGENT_ORIGINAL: &str = "user_agent.original";

/// The header used to echo the request identifier back to the client.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// The top-level span for an incoming request.
///
/// It's created with every field it will ever carry: `tracing` ignores attempts
/// to record fields that weren't declared upfront.
#[derive(Debug, Clone)]
pub struct RootSpan(tracing::Span);

impl RootSpan {
    pub fn new(span: tracing::Span) -> Self {
        Self(span)
    }

    pub fn into_inner(self) -> tracing::Span {
        self.0
    }
}

/// Construct a new root span for the given request.
pub fn root_span(
    request_head: &RequestHead,
    connection: &ConnectionInfo,
    route: Option<Route>,
    request_id: ServerRequestId,
) -> RootSpan {
    // `{ HTTP_REQUEST_METHOD }` is evaluated as an expression, i.e. "http.request.method".
    let span = tracing::info_span!(
        "HTTP request",
        { CLIENT_ADDRESS } = client_address(connection),
        { HTTP_REQUEST_METHOD } = http_request_method(request_head),
        { HTTP_REQUEST_SERVER_ID } = http_request_server_id(request_id),
        { HTTP_ROUTE } = http_route(route),
        { NETWORK_PROTOCOL_VERSION } = network_protocol_version(request_head),
        { URL_QUERY } = url_query(request_head),
        { URL_PATH } = url_path(request_head),
        { USER_AGENT_ORIGINAL } = user_agent_original(request_head),
        // Populated by `response_logger` and `error_logger`.
        { HTTP_RESPONSE_STATUS_CODE } = tracing::field::Empty,
        { ERROR_MESSAGE } = tracing::field::Empty,
        { ERROR_DETAILS } = tracing::field::Empty,
        { ERROR_SOURCE_CHAIN } = tracing::field::Empty,
    );
    RootSpan::new(span)
}

/// Emit the access log line for an incoming request: client address, method and target.
pub fn log_request(request_head: &RequestHead, connection: &ConnectionInfo) {
    tracing::info!(
        "{} {} {}",
        connection.peer_addr(),
        request_head.method,
        request_head.path_and_query()
    );
}

/// Record the response status on the current root span and
/// echo the request identifier back to the client.
pub fn response_logger(response: Response, request_id: ServerRequestId) -> Response {
    tracing::Span::current().record(
        HTTP_RESPONSE_STATUS_CODE,
        http_response_status_code(&response),
    );
    response.insert_header(REQUEST_ID_HEADER, request_id.header_value())
}

/// Log an error that's about to turn into a `500 Internal Server Error`.
///
/// It emits an error event and attaches the error details to the current root span.
pub fn error_logger<E>(e: &E, message: &'static str)
where
    E: std::error::Error + ?Sized,
{
    tracing_log_error::log_error!(*e, "{}", message);
    let span = tracing::Span::current();
    span.record(ERROR_MESSAGE, error_message(e));
    span.record(ERROR_DETAILS, error_details(e));
    span.record(ERROR_SOURCE_CHAIN, error_source_chain(e));
}

pub fn client_address(connection: &ConnectionInfo) -> impl Value + use<> {
    tracing::field::display(connection.peer_addr().ip())
}

pub fn http_request_method(request_head: &RequestHead) -> impl Value + use<> {
    match request_head.method {
        Method::GET => "GET",
        Method::POST => "POST",
        Method::PUT => "PUT",
        Method::TRACE => "TRACE",
        Method::PATCH => "PATCH",
        Method::CONNECT => "CONNECT",
        Method::HEAD => "HEAD",
        Method::DELETE => "DELETE",
        Method::OPTIONS => "OPTIONS",
        _ => "_OTHER",
    }
}

pub fn http_request_server_id(id: ServerRequestId) -> impl Value {
    tracing::field::display(id)
}

pub fn http_response_status_code(response: &Response) -> impl Value + use<> {
    response.status().as_u16()
}

/// Unknown paths are recorded as `_UNMATCHED`, to keep the field's cardinality bounded.
pub fn http_route(route: Option<Route>) -> impl Value {
    route.map(|r| r.path()).unwrap_or("_UNMATCHED")
}

pub fn network_protocol_version(request_head: &RequestHead) -> impl Value + use<> {
    match request_head.version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_11 => "1.1",
        Version::HTTP_2 => "2.0",
        Version::HTTP_3 => "3.0",
        _ => "_OTHER",
    }
}

pub fn url_path(request_head: &RequestHead) -> impl Value + '_ {
    request_head.target.path()
}

pub fn url_query(request_head: &RequestHead) -> impl Value + '_ {
    request_head.target.query().unwrap_or_default()
}

pub fn user_agent_original(request_head: &RequestHead) -> impl Value + '_ {
    request_head
        .headers
        .get(http::header::USER_AGENT)
        .map(|h| h.to_str().unwrap_or_default())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use turnstile_http::Response;
    use turnstile_http::telemetry::ServerRequestId;

    use super::{REQUEST_ID_HEADER, response_logger};

    #[test]
    fn the_request_id_is_echoed_back() {
        let id = ServerRequestId::generate();
        let response = response_logger(Response::ok(), id);
        assert_eq!(
            response.headers()[REQUEST_ID_HEADER].to_str().unwrap(),
            id.to_string()
        );
    }
}
