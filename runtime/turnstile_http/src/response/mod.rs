//! Build HTTP responses.
pub use response_::Response;

pub mod body;
mod response_;

/// The body type of every [`Response`]: the payload is always buffered in memory.
pub type ResponseBody = http_body_util::Full<bytes::Bytes>;
