use turnstile_http::Response;

/// Liveness check: it always answers `200 OK`.
pub fn get() -> Response {
    Response::ok().set_typed_body("healthy")
}
