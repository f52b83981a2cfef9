//! Extract data from the body of incoming requests.
//!
//! # Overview
//!
//! Body extractors are layered:
//!
//! 1. [`RawIncomingBody`] is the stream of bytes received by the server.
//!    You rarely want to work with it directly.
//! 2. [`BufferedBody`] buffers a [`RawIncomingBody`] in memory, enforcing a [`BodySizeLimit`]
//!    to avoid resource exhaustion.
//! 3. [`FormValues`] parses a [`BufferedBody`] as an HTML form, urlencoded or multipart.
pub use buffered_body::BufferedBody;
pub use form::{FormEncoding, FormValues};
pub use limit::BodySizeLimit;

/// The raw body of an incoming request, as handed over by `hyper`.
pub type RawIncomingBody = hyper::body::Incoming;

mod buffered_body;
pub mod errors;
mod form;
mod limit;
