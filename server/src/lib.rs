//! Configuration, telemetry and network plumbing for the `turnstile` binary.
pub mod configuration;
pub mod network;
pub mod telemetry;
