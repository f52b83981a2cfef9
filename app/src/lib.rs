//! The `turnstile` application: a login form, a page gated behind a session cookie,
//! and a health check.
//!
//! Every page echoes the client address, the request headers and the address of
//! the instance that served it, to make load-balancing behaviour visible from a browser.
//!
//! [`route_request`] is the entrypoint: hand it to a [`Server`](turnstile_http::server::Server)
//! alongside an [`ApplicationState`].
pub mod configuration;
pub mod pages;
pub mod routes;
pub mod routing;
mod state;
pub mod telemetry;

pub use routing::route_request;
pub use state::ApplicationState;
