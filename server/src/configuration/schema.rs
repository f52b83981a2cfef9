use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::time::Duration;

use anyhow::Context;
use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use turnstile::configuration::AppConfig;
use turnstile_http::server::{IncomingStream, ServerConfiguration, ShutdownMode};

use crate::configuration::ApplicationProfile;

#[derive(serde::Deserialize, Debug, Clone)]
/// The top-level configuration object, determining the schema
/// we expect to see in the configuration files stored under `server/configuration`.
///
/// It bundles together the app configuration ([`AppConfig`]) and the HTTP server
/// configuration ([`ServerConfig`]).
/// Request handlers only ever see the former.
pub struct Config {
    pub server: ServerConfig,
    #[serde(flatten)]
    pub app: AppConfig,
}

impl Config {
    /// Retrieve the application configuration by merging multiple configuration sources.
    ///
    /// # Application profiles
    ///
    /// Each profile gets its own file, so that values for different environments are
    /// never co-located.
    /// The profile is read from the `APP_PROFILE` environment variable, falling back to
    /// `default_profile` if the variable is not set.
    ///
    /// # Hierarchy
    ///
    /// The configuration sources are:
    ///
    /// 1. `base.yml` - The default values, common to all profiles.
    /// 2. `<profile>.yml` - The values specific to the desired profile.
    /// 3. Environment variables prefixed with `APP_`, using `__` as a separator
    ///    for nested keys (e.g. `APP_SESSION__COOKIE__SECURE=true`).
    ///
    /// Later sources override earlier ones.
    pub fn load(default_profile: Option<ApplicationProfile>) -> Result<Config, anyhow::Error> {
        let application_profile = ApplicationProfile::load(default_profile)
            .context("Failed to load the desired application profile")?;

        let configuration_dir = {
            let manifest_dir = env!(
                "CARGO_MANIFEST_DIR",
                "`CARGO_MANIFEST_DIR` was not set. Are you using a custom build system?"
            );
            std::path::Path::new(manifest_dir).join("configuration")
        };

        let base_filepath = configuration_dir.join("base.yml");

        let profile_filename = format!("{}.yml", application_profile.as_str());
        let profile_filepath = configuration_dir.join(profile_filename);

        let figment = Figment::new()
            .merge(Yaml::file(base_filepath))
            .merge(Yaml::file(profile_filepath))
            .merge(Env::prefixed("APP_").split("__"));

        let configuration: Config = figment
            .extract()
            .context("Failed to load hierarchical configuration")?;
        Ok(configuration)
    }
}

#[derive(serde::Deserialize, Debug, Clone)]
/// Configuration for the HTTP server.
pub struct ServerConfig {
    /// The port that the server must listen on.
    ///
    /// Set it to `0` to let the operating system pick a free port.
    pub port: u16,
    /// The network interface that the server must be bound to.
    ///
    /// E.g. `0.0.0.0` for listening to incoming requests from
    /// all sources.
    pub ip: std::net::IpAddr,
    /// How long in-flight requests are given to complete once shutdown begins.
    #[serde(with = "humantime_serde")]
    pub graceful_shutdown_timeout: Duration,
    /// The number of worker threads.
    ///
    /// Defaults to the available parallelism of the host.
    #[serde(default)]
    pub workers: Option<NonZeroUsize>,
}

impl ServerConfig {
    /// Bind a TCP listener according to the specified parameters.
    pub async fn listener(&self) -> Result<IncomingStream, std::io::Error> {
        let addr = SocketAddr::new(self.ip, self.port);
        IncomingStream::bind(addr).await
    }

    /// Settings for the acceptor and its workers.
    pub fn server_configuration(&self) -> ServerConfiguration {
        let config = ServerConfiguration::new();
        match self.workers {
            Some(n) => config.set_n_workers(n),
            None => config,
        }
    }

    /// How the server stops when asked to.
    pub fn shutdown_mode(&self) -> ShutdownMode {
        ShutdownMode::Graceful {
            timeout: self.graceful_shutdown_timeout,
        }
    }
}
