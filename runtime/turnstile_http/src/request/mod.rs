//! Extract data from incoming HTTP requests.
use http::{HeaderMap, Method, Uri, Version};

pub mod body;

/// All the information that is transmitted as part of an HTTP request ahead of the body.
///
/// It includes the [method](Method), the [target](Uri),
/// the [HTTP version](Version), and the [headers](HeaderMap).
#[non_exhaustive]
#[derive(Debug)]
pub struct RequestHead {
    /// The HTTP method of the request.
    pub method: Method,
    /// The [target](https://datatracker.ietf.org/doc/html/rfc7230#section-5.3) of the request.
    pub target: Uri,
    /// The HTTP version used by the request.
    pub version: Version,
    /// The headers attached to the request.
    pub headers: HeaderMap,
}

impl RequestHead {
    /// The target path and query, in the form the client sent it.
    ///
    /// It falls back to `/` for targets that carry no path (e.g. `*`).
    pub fn path_and_query(&self) -> &str {
        self.target
            .path_and_query()
            .map(|p| p.as_str())
            .unwrap_or("/")
    }
}

impl From<http::request::Parts> for RequestHead {
    fn from(parts: http::request::Parts) -> Self {
        Self {
            method: parts.method,
            target: parts.uri,
            version: parts.version,
            headers: parts.headers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RequestHead;

    #[test]
    fn path_and_query_mirrors_the_request_target() {
        let (parts, _) = http::Request::builder()
            .uri("/login?name=alice")
            .body(())
            .unwrap()
            .into_parts();
        let head = RequestHead::from(parts);
        assert_eq!(head.path_and_query(), "/login?name=alice");
        assert_eq!(head.target.path(), "/login");
    }
}
