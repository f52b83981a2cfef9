use std::sync::Once;

use reqwest::header::{COOKIE, SET_COOKIE};
use tracing::subscriber::set_global_default;
use tracing_subscriber::EnvFilter;
use turnstile::ApplicationState;
use turnstile::route_request;
use turnstile_http::server::{Server, ServerHandle, ShutdownMode};
use turnstile_server::configuration::{ApplicationProfile, Config};

pub struct TestApi {
    pub api_address: String,
    pub api_client: reqwest::Client,
    pub server_handle: ServerHandle,
}

impl TestApi {
    pub async fn spawn() -> Self {
        Self::init_telemetry();
        let config = Self::get_config();

        let application_state = ApplicationState::new(&config.app, None)
            .expect("Failed to build the application state");

        let tcp_listener = config
            .server
            .listener()
            .await
            .expect("Failed to bind the server TCP listener");
        let address = tcp_listener
            .local_addr()
            .expect("The server TCP listener doesn't have a local socket address");
        let server_handle = Server::new()
            .set_config(config.server.server_configuration())
            .listen(tcp_listener)
            .serve(route_request, application_state)
            .expect("Failed to start the server");

        TestApi {
            api_address: format!("http://{}:{}", config.server.ip, address.port()),
            // Redirects are asserted on, never followed.
            api_client: reqwest::Client::builder()
                .redirect(reqwest::redirect::Policy::none())
                .build()
                .expect("Failed to build the API client"),
            server_handle,
        }
    }

    /// Load the test configuration and make sure tests are isolated from each other.
    fn get_config() -> Config {
        let mut config = Config::load(Some(ApplicationProfile::Test))
            .expect("Failed to load test configuration");
        // Port `0` lets the operating system pick a free port for each test.
        config.server.port = 0;
        config
    }

    fn init_telemetry() {
        // Initialize the telemetry setup at most once.
        static INIT_TELEMETRY: Once = Once::new();
        INIT_TELEMETRY.call_once(|| {
            // Only enable the telemetry if the `TEST_LOG` environment variable is set.
            if std::env::var("TEST_LOG").is_ok() {
                let subscriber = tracing_subscriber::fmt::Subscriber::builder()
                    .with_env_filter(
                        EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new("info")),
                    )
                    .finish();
                set_global_default(subscriber).expect("Failed to set a `tracing` global subscriber")
            }
        });
    }

    pub async fn stop(self) {
        self.server_handle.shutdown(ShutdownMode::Forced).await;
    }
}

/// Convenient methods for calling the API under test.
impl TestApi {
    pub async fn get(&self, path: &str, session_cookie: Option<&str>) -> reqwest::Response {
        let mut request = self.api_client.get(format!("{}{path}", &self.api_address));
        if let Some(cookie) = session_cookie {
            request = request.header(COOKIE, cookie);
        }
        request.send().await.expect("Failed to execute request.")
    }

    pub async fn post_login(&self, name: &str, password: &str) -> reqwest::Response {
        self.api_client
            .post(format!("{}/login", &self.api_address))
            .form(&[("name", name), ("password", password)])
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_logout(&self, session_cookie: Option<&str>) -> reqwest::Response {
        let mut request = self.api_client.post(format!("{}/logout", &self.api_address));
        if let Some(cookie) = session_cookie {
            request = request.header(COOKIE, cookie);
        }
        request.send().await.expect("Failed to execute request.")
    }
}

/// The `name=value` pair set by the first `Set-Cookie` header of `response`, if any.
pub fn set_cookie_pair(response: &reqwest::Response) -> Option<String> {
    let header = response.headers().get(SET_COOKIE)?.to_str().ok()?;
    header.split(';').next().map(|pair| pair.trim().to_owned())
}

/// The raw `Set-Cookie` header of `response`.
pub fn set_cookie_header(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(SET_COOKIE)
        .expect("No `Set-Cookie` header")
        .to_str()
        .expect("`Set-Cookie` is not valid ASCII")
        .to_owned()
}

pub fn location(response: &reqwest::Response) -> &str {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .expect("No `Location` header")
        .to_str()
        .expect("`Location` is not valid ASCII")
}
