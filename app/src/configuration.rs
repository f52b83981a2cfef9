use std::net::Ipv4Addr;

use biscotti::ProcessorConfig;
use turnstile_http::request::body::BodySizeLimit;
use turnstile_session::SessionConfig;
use ubyte::{ByteUnit, ToByteUnit};

#[derive(serde::Deserialize, Debug, Clone)]
/// The configuration object holding all the values required
/// to configure the application.
pub struct AppConfig {
    /// How login sessions are stored and protected.
    #[serde(default)]
    pub session: SessionConfig,
    /// What this instance shows about itself on every page.
    #[serde(default)]
    pub instance: InstanceConfig,
    /// Limits on incoming request bodies.
    #[serde(default)]
    pub request_body: RequestBodyConfig,
    /// How cookies are encoded and decoded on the wire.
    #[serde(default)]
    pub cookies: ProcessorConfig,
}

#[derive(serde::Deserialize, Debug, Clone)]
/// Per-instance presentation settings.
pub struct InstanceConfig {
    /// The CSS color of the page heading.
    ///
    /// Useful to tell instances apart at a glance.
    #[serde(default = "default_color")]
    pub color: String,
    /// The address shown as "Served from".
    ///
    /// When missing, the server discovers its outward-facing IPv4 at startup.
    #[serde(default)]
    pub served_from: Option<Ipv4Addr>,
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            color: default_color(),
            served_from: None,
        }
    }
}

fn default_color() -> String {
    "black".into()
}

#[derive(serde::Deserialize, Debug, Clone, Copy)]
/// Configuration for request bodies.
pub struct RequestBodyConfig {
    /// Bodies larger than this are not read.
    #[serde(default = "default_max_body_size")]
    pub max_size: ByteUnit,
}

impl Default for RequestBodyConfig {
    fn default() -> Self {
        Self {
            max_size: default_max_body_size(),
        }
    }
}

impl RequestBodyConfig {
    pub fn body_size_limit(&self) -> BodySizeLimit {
        BodySizeLimit::Enabled {
            max_size: self.max_size,
        }
    }
}

fn default_max_body_size() -> ByteUnit {
    2.megabytes()
}
