//! The HTTP plumbing behind `turnstile`.
//!
//! - [`server`]: a multi-threaded HTTP server, with one single-threaded runtime per worker;
//! - [`request`] and [`response`]: the types handlers work with;
//! - [`cookie`]: parsing request cookies and attaching response cookies;
//! - [`router`] and [`telemetry`]: small building blocks for routing and observability.
pub mod connection;
pub mod cookie;
pub mod request;
pub mod response;
pub mod router;
pub mod server;
pub mod telemetry;

pub use http;
pub use response::Response;
